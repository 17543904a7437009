//! Signed cookies for the password gate.
//!
//! A token only proves that someone typed the shared password within the
//! configured lifetime. It carries no identity beyond a random session id,
//! and it is bound to the gate audience so a token minted with the same
//! secret for any other purpose does not open the app.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// `aud` claim of every gate token.
pub const GATE_AUDIENCE: &str = "weekly-report:gate";

const CLOCK_SKEW_SECS: u64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub aud: String,
    pub exp: u64,
    pub iat: u64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),

    #[error("session id is not a uuid")]
    BadSubject,
}

pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionTokens {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for a freshly unlocked session.
    pub fn issue(&self, session_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = SessionClaims {
            sub: session_id.to_string(),
            aud: GATE_AUDIENCE.to_string(),
            exp: now + self.ttl.as_secs(),
            iat: now,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Check signature, expiry and audience; yield the session id.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = CLOCK_SKEW_SECS;
        validation.set_audience(&[GATE_AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "aud", "sub"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::BadSubject)
    }
}
