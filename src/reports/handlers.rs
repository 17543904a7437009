use axum::{
    Form, Json,
    extract::State,
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{Html, IntoResponse, Response},
};
use tracing::info;

use crate::{
    app_state::AppState,
    auth::{AuthError, Session},
    digest::Stage,
    pages,
    reports::{
        dtos::{CreateReportRequest, DownloadForm, ReportForm, ReportResponse, validate_links_input},
        errors::{ApiError, describe},
    },
};

pub const REPORT_FILENAME: &str = "report.md";
pub const MARKDOWN_MIME: &str = "text/markdown; charset=utf-8";

/// Logs each stage and keeps it for the page.
fn track(stages: &mut Vec<Stage>) -> impl FnMut(Stage) + Send + '_ {
    move |stage| {
        info!(%stage, "digest progress");
        stages.push(stage);
    }
}

pub async fn index(State(state): State<AppState>, session: Result<Session, AuthError>) -> Html<String> {
    if state.gate_enabled() && session.is_err() {
        return Html(pages::login_page(None));
    }
    Html(pages::form_page())
}

pub async fn create_report(
    _session: Session,
    State(state): State<AppState>,
    Form(form): Form<ReportForm>,
) -> Response {
    if let Err(error) = validate_links_input(&form.links) {
        return (
            StatusCode::BAD_REQUEST,
            Html(pages::notice_page("", "error", &error, &[])),
        )
            .into_response();
    }

    let mut stages = Vec::new();
    let result = state.digest.run(&form.links, track(&mut stages)).await;
    match result {
        Ok(outcome) => Html(pages::report_page(
            &form.links,
            &outcome.report.markdown,
            &outcome.articles,
            &stages,
        ))
        .into_response(),
        Err(e) => {
            let (status, message) = describe(&e);
            let class = if status == StatusCode::BAD_REQUEST {
                "warning"
            } else {
                "error"
            };
            (
                status,
                Html(pages::notice_page(&form.links, class, &message, &stages)),
            )
                .into_response()
        }
    }
}

pub async fn download_report(_session: Session, Form(form): Form<DownloadForm>) -> Response {
    if form.report.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Nothing to download").into_response();
    }

    (
        [
            (CONTENT_TYPE, MARKDOWN_MIME.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILENAME),
            ),
        ],
        form.report,
    )
        .into_response()
}

pub async fn api_create_report(
    _session: Session,
    State(state): State<AppState>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    payload
        .validate()
        .map_err(|error| ApiError(StatusCode::BAD_REQUEST, error))?;

    let outcome = state
        .digest
        .run(&payload.links, |stage| info!(%stage, "digest progress"))
        .await?;
    Ok(Json(outcome.into()))
}
