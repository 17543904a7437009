#![allow(dead_code)]

use axum::Router;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

use weekly_report::{
    app_state::AppState,
    config::{Config, FetchSettings},
    digest::Digest,
    routes::router,
};

pub const API_KEY: &str = "test-key";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

/// Config pointing the composer at `gemini` with throttling disabled.
pub fn test_config(gemini: &MockServer) -> Config {
    Config::new(API_KEY)
        .with_gemini_base_url(gemini.uri())
        .with_session_secret("integration-secret")
        .with_fetch(FetchSettings::default().without_delay())
}

pub fn test_app(config: &Config) -> Router {
    let digest = Digest::from_config(config).unwrap();
    router(AppState::new(config, digest))
}

pub fn article_html(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><meta charset="utf-8"></head><body>
<h1 id="activity-name">{title}</h1>
<div id="js_content"><p>{body}</p></div>
</body></html>"#
    )
}

pub async fn mount_article(server: &MockServer, route: &str, title: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(article_html(title, body).into_bytes())
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

pub fn gemini_text(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    }))
}

pub fn gemini_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {"code": status, "message": message, "status": "ERROR"}
    }))
}

/// Answer every generation request with `response`, expecting `times` calls.
pub async fn mount_gemini(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

pub fn form_body(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
