//! Sign-in session lifecycle
//!
//! A `SignInSession` represents one outstanding launch of the provider
//! surface. It binds the configuration that was handed to the surface to a
//! fresh correlation token, and remembers whether it is already the bounded
//! retry of an earlier attempt.

use crate::provider::ProviderConfig;
use crate::utils::crypto::generate_nonce;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request code attached to every provider launch
pub const SIGN_IN_REQUEST_CODE: i32 = 20;

/// Random bytes in a correlation token (128 bits)
pub const CORRELATION_TOKEN_BYTES: usize = 16;

/// Opaque value binding an asynchronous provider result to the launch that requested it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    /// Generate a fresh random token
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_nonce(CORRELATION_TOKEN_BYTES))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CorrelationToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CorrelationToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// What the provider surface is asked to open
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchRequest {
    pub request_code: i32,
    pub token: CorrelationToken,
    pub config: ProviderConfig,
}

/// One outstanding sign-in attempt
#[derive(Debug, Clone)]
pub struct SignInSession {
    token: CorrelationToken,
    config: ProviderConfig,
    retried: bool,
    started_at: DateTime<Utc>,
}

impl SignInSession {
    /// First attempt of a logical login request
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            token: CorrelationToken::generate(),
            config,
            retried: false,
            started_at: Utc::now(),
        }
    }

    /// The single relaunch of a logical login request, with its own token
    #[must_use]
    pub fn retry(config: ProviderConfig) -> Self {
        Self {
            retried: true,
            ..Self::new(config)
        }
    }

    #[must_use]
    pub fn token(&self) -> &CorrelationToken {
        &self.token
    }

    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Whether this session is already the retry of an earlier attempt
    #[must_use]
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// 1 for the first attempt, 2 for the retry
    #[must_use]
    pub fn attempt(&self) -> u8 {
        if self.retried {
            2
        } else {
            1
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Utc::now() - self.started_at
    }

    /// Check whether a delivered token belongs to this session
    #[must_use]
    pub fn matches(&self, token: &CorrelationToken) -> bool {
        self.token == *token
    }

    #[must_use]
    pub fn launch_request(&self) -> LaunchRequest {
        LaunchRequest {
            request_code: SIGN_IN_REQUEST_CODE,
            token: self.token.clone(),
            config: self.config.clone(),
        }
    }
}
