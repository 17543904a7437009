use axum::{
    Router,
    http::HeaderName,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    app_state::AppState,
    auth::handlers::login,
    health::health_check,
    reports::handlers::{api_create_report, create_report, download_report, index},
};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", post(login))
        .route("/report", post(create_report))
        .route("/report/download", post(download_report))
        .route("/v1/reports", post(api_create_report))
        .route("/healthz", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER)),
        )
        .with_state(state)
}
