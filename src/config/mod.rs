//! Configuration handling for the application.
//!
//! Everything the fetcher, composer and web layer need is read once at
//! process start into a [`Config`] and passed around by reference. Nothing
//! here writes back to the process environment.

use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use url::Url;

/// Environment variable names.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_APP_PASSWORD: &str = "APP_PASSWORD";
pub const ENV_SESSION_SECRET: &str = "SESSION_SECRET";
pub const ENV_SESSION_TTL_HOURS: &str = "SESSION_TTL_HOURS";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_HTTP_PROXY: &str = "HTTP_PROXY";
pub const ENV_HTTPS_PROXY: &str = "HTTPS_PROXY";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_FETCH_DELAY_MIN_MS: &str = "FETCH_DELAY_MIN_MS";
pub const ENV_FETCH_DELAY_MAX_MS: &str = "FETCH_DELAY_MAX_MS";
pub const ENV_MAX_BODY_CHARS: &str = "MAX_BODY_CHARS";
pub const ENV_TITLE_SELECTOR: &str = "TITLE_SELECTOR";
pub const ENV_BODY_SELECTOR: &str = "BODY_SELECTOR";

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_SESSION_TTL_HOURS: u64 = 24;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FETCH_DELAY_MIN_MS: u64 = 500;
const DEFAULT_FETCH_DELAY_MAX_MS: u64 = 1500;
const DEFAULT_MAX_BODY_CHARS: usize = 3000;

/// Title element on a WeChat article page.
pub const DEFAULT_TITLE_SELECTOR: &str = "#activity-name";
/// Body container on a WeChat article page.
pub const DEFAULT_BODY_SELECTOR: &str = "#js_content";

/// Knobs for the article fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    pub max_body_chars: usize,
    pub title_selector: String,
    pub body_selector: String,
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            delay_min_ms: DEFAULT_FETCH_DELAY_MIN_MS,
            delay_max_ms: DEFAULT_FETCH_DELAY_MAX_MS,
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
            title_selector: DEFAULT_TITLE_SELECTOR.to_string(),
            body_selector: DEFAULT_BODY_SELECTOR.to_string(),
            http_proxy: None,
            https_proxy: None,
        }
    }
}

impl FetchSettings {
    /// No throttling delay; handy for tests and local runs.
    pub fn without_delay(mut self) -> Self {
        self.delay_min_ms = 0;
        self.delay_max_ms = 0;
        self
    }
}

/// Application runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
    model: String,
    gemini_base_url: String,
    password: Option<String>,
    session_secret: String,
    session_ttl: Duration,
    bind_addr: String,
    fetch: FetchSettings,
}

impl Config {
    /// Create a config with the given API key and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            password: None,
            session_secret: uuid::Uuid::new_v4().to_string(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_HOURS * 3600),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            fetch: FetchSettings::default(),
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_gemini_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.gemini_base_url = base_url.into();
        self
    }

    pub fn with_session_secret(mut self, secret: impl Into<String>) -> Self {
        self.session_secret = secret.into();
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_fetch(mut self, fetch: FetchSettings) -> Self {
        self.fetch = fetch;
        self
    }

    /// Load from environment variables, falling back to defaults.
    ///
    /// Fails when the API key is missing or a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but over an in-memory map.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values are treated the same as missing ones.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(ENV_GEMINI_API_KEY).ok_or(ConfigError::Missing(ENV_GEMINI_API_KEY))?;

        let mut config = Self::new(api_key);
        if let Some(model) = get(ENV_GEMINI_MODEL) {
            config.model = model;
        }
        if let Some(base_url) = get(ENV_GEMINI_BASE_URL) {
            parse_url(ENV_GEMINI_BASE_URL, &base_url)?;
            config.gemini_base_url = base_url.trim_end_matches('/').to_string();
        }
        config.password = get(ENV_APP_PASSWORD);
        if let Some(secret) = get(ENV_SESSION_SECRET) {
            config.session_secret = secret;
        }
        if let Some(hours) = get(ENV_SESSION_TTL_HOURS) {
            let hours: u64 = parse_number(ENV_SESSION_TTL_HOURS, &hours)?;
            if hours == 0 {
                return Err(ConfigError::InvalidValue {
                    field: ENV_SESSION_TTL_HOURS,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.session_ttl = Duration::from_secs(hours * 3600);
        }
        if let Some(bind_addr) = get(ENV_BIND_ADDR) {
            config.bind_addr = bind_addr;
        }

        let fetch = &mut config.fetch;
        if let Some(secs) = get(ENV_FETCH_TIMEOUT_SECS) {
            let secs: u64 = parse_number(ENV_FETCH_TIMEOUT_SECS, &secs)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: ENV_FETCH_TIMEOUT_SECS,
                    reason: "must be greater than zero".to_string(),
                });
            }
            fetch.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = get(ENV_FETCH_DELAY_MIN_MS) {
            fetch.delay_min_ms = parse_number(ENV_FETCH_DELAY_MIN_MS, &ms)?;
        }
        if let Some(ms) = get(ENV_FETCH_DELAY_MAX_MS) {
            fetch.delay_max_ms = parse_number(ENV_FETCH_DELAY_MAX_MS, &ms)?;
        }
        if fetch.delay_min_ms > fetch.delay_max_ms {
            return Err(ConfigError::InvalidValue {
                field: ENV_FETCH_DELAY_MIN_MS,
                reason: format!(
                    "{} exceeds {} ({})",
                    fetch.delay_min_ms, ENV_FETCH_DELAY_MAX_MS, fetch.delay_max_ms
                ),
            });
        }
        if let Some(chars) = get(ENV_MAX_BODY_CHARS) {
            fetch.max_body_chars = parse_number(ENV_MAX_BODY_CHARS, &chars)?;
        }
        if let Some(selector) = get(ENV_TITLE_SELECTOR) {
            fetch.title_selector = selector;
        }
        if let Some(selector) = get(ENV_BODY_SELECTOR) {
            fetch.body_selector = selector;
        }
        if let Some(proxy) = get(ENV_HTTP_PROXY) {
            parse_url(ENV_HTTP_PROXY, &proxy)?;
            fetch.http_proxy = Some(proxy);
        }
        if let Some(proxy) = get(ENV_HTTPS_PROXY) {
            parse_url(ENV_HTTPS_PROXY, &proxy)?;
            fetch.https_proxy = Some(proxy);
        }

        Ok(config)
    }

    /// Key for the text-generation service.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
    /// Model identifier sent to the text-generation service.
    pub fn model(&self) -> &str {
        &self.model
    }
    pub fn gemini_base_url(&self) -> &str {
        &self.gemini_base_url
    }
    /// Access password; `None` disables the gate.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
    /// Secret used for signing session tokens.
    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }
    /// How long a password-gate session stays valid.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    pub fn fetch(&self) -> &FetchSettings {
        &self.fetch
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("session_secret", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .field("bind_addr", &self.bind_addr)
            .field("fetch", &self.fetch)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A required variable is absent or blank.
    Missing(&'static str),
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(field) => write!(f, "missing required setting '{}'", field),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
