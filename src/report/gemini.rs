use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::report::errors::GenerationError;

const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Opaque text-completion service: one prompt in, one text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, GenerationError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(GenerationError::EmptyResponse(block_reason));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse(candidate.finish_reason));
        }
        Ok(text)
    }
}

/// Gemini `generateContent` over plain HTTP. No generation parameters are
/// sent, so the service defaults apply.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = ClientBuilder::new().timeout(GENERATION_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: config.gemini_base_url().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
            api_key: config.api_key().to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip_all, fields(model = %self.model, prompt_chars = prompt.chars().count()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        debug!(%status, bytes = raw.len(), "generation response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(GenerationError::from_status(status.as_u16(), message));
        }

        serde_json::from_str::<GenerateResponse>(&raw)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?
            .into_text()
    }
}
