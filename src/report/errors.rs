use thiserror::Error;

/// Failure of the single call to the text-generation service.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("authentication rejected: {0}")]
    Unauthorized(String),

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("generation api error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("empty response{}", .0.as_ref().map(|r| format!(" ({r})")).unwrap_or_default())]
    EmptyResponse(Option<String>),
}

impl GenerationError {
    /// Classify a non-success answer from the service.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message),
            // Gemini reports a bad key as a 400 INVALID_ARGUMENT
            400 if message.contains("API key") => Self::Unauthorized(message),
            429 => Self::QuotaExceeded(message),
            _ => Self::Api { status, message },
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
