use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{auth::dtos::ErrorResponse, digest::DigestError};

pub const NO_LINKS_WARNING: &str = "⚠️ 请先粘贴至少一个链接！";

/// Status code and user-facing message for a failed run.
pub fn describe(err: &DigestError) -> (StatusCode, String) {
    match err {
        DigestError::NoLinks => (StatusCode::BAD_REQUEST, NO_LINKS_WARNING.to_string()),
        DigestError::Generation(e) => (StatusCode::BAD_GATEWAY, format!("AI 生成出错: {}", e)),
    }
}

/// JSON rendering used by the API routes.
pub struct ApiError(pub StatusCode, pub String);

impl From<DigestError> for ApiError {
    fn from(err: DigestError) -> Self {
        let (status, message) = describe(&err);
        Self(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorResponse { error: self.1 })).into_response()
    }
}
