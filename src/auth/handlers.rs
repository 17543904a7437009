use axum::{
    Form,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
};
use subtle::ConstantTimeEq;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::{dtos::LoginForm, middleware::SESSION_COOKIE},
    pages,
};

pub const WRONG_PASSWORD: &str = "❌ 密码错误，请重试";

fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

fn password_matches(given: &str, expected: &str) -> bool {
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}

pub async fn login(State(state): State<AppState>, Form(payload): Form<LoginForm>) -> Response {
    let Some(expected) = state.password.as_deref() else {
        // Gate is off; nothing to log into.
        return Redirect::to("/").into_response();
    };

    if !password_matches(&payload.password, expected) {
        warn!("rejected login attempt");
        return (
            StatusCode::UNAUTHORIZED,
            Html(pages::login_page(Some(WRONG_PASSWORD))),
        )
            .into_response();
    }

    let session_id = Uuid::new_v4();
    match state.sessions.issue(session_id) {
        Ok(token) => {
            info!(%session_id, "session started");
            (
                [(SET_COOKIE, session_cookie(&token, state.sessions.ttl().as_secs()))],
                Redirect::to("/"),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to issue session token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::login_page(Some("Internal server error"))),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_matches() {
        assert!(password_matches("letmein", "letmein"));
        assert!(password_matches("医药周报", "医药周报"));
        assert!(!password_matches("letmei", "letmein"));
        assert!(!password_matches("letmein!", "letmein"));
        assert!(!password_matches("", "letmein"));
        assert!(!password_matches("LETMEIN", "letmein"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", 7200);
        assert_eq!(
            cookie,
            "session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=7200"
        );
    }
}
