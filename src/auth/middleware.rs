use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, header::COOKIE, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{app_state::AppState, auth::dtos::ErrorResponse};

pub const SESSION_COOKIE: &str = "session";

/// Proof that the caller may use the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// No password is configured.
    Open,
    Verified { session_id: Uuid },
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "));
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

pub fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<Session, AuthError> {
    if !state.gate_enabled() {
        return Ok(Session::Open);
    }

    let token = token_from_headers(headers).ok_or(AuthError::MissingToken)?;
    let session_id = state
        .sessions
        .verify(&token)
        .map_err(|_| AuthError::InvalidToken)?;

    Ok(Session::Verified { session_id })
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AuthError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = authenticate(&parts.headers, state);
        async move { result }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing session",
            AuthError::InvalidToken => "Invalid or expired session",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
