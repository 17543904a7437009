use std::sync::Arc;

use crate::{auth::jwt::SessionTokens, config::Config, digest::Digest};

#[derive(Clone)]
pub struct AppState {
    pub digest: Digest,
    pub sessions: Arc<SessionTokens>,
    pub password: Option<Arc<str>>,
}

impl AppState {
    pub fn new(config: &Config, digest: Digest) -> Self {
        Self {
            digest,
            sessions: Arc::new(SessionTokens::new(
                config.session_secret(),
                config.session_ttl(),
            )),
            password: config.password().map(Arc::from),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config, Digest::from_config(config)?))
    }

    pub fn gate_enabled(&self) -> bool {
        self.password.is_some()
    }
}
