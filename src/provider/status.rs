//! Provider status codes
//!
//! Named constants for the status codes the Google sign-in surface reports
//! alongside every result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code attached to a provider sign-in result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub i32);

impl StatusCode {
    /// Success served from a previously granted sign-in
    pub const SUCCESS_CACHE: Self = Self(-1);
    pub const SUCCESS: Self = Self(0);
    pub const SIGN_IN_REQUIRED: Self = Self(4);
    /// The hinted or cached account was rejected by the provider
    pub const INVALID_ACCOUNT: Self = Self(5);
    pub const NETWORK_ERROR: Self = Self(7);
    pub const INTERNAL_ERROR: Self = Self(8);
    /// The application is misconfigured (client id, package signature)
    pub const DEVELOPER_ERROR: Self = Self(10);
    pub const TIMEOUT: Self = Self(15);
    pub const CANCELED: Self = Self(16);
    pub const SIGN_IN_FAILED: Self = Self(12500);
    pub const SIGN_IN_CANCELLED: Self = Self(12501);
    pub const SIGN_IN_CURRENTLY_IN_PROGRESS: Self = Self(12502);

    /// Zero and every negative code report success
    #[must_use]
    pub fn is_success(self) -> bool {
        self.0 <= 0
    }

    /// Symbolic name for well-known codes
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::SUCCESS_CACHE => "SUCCESS_CACHE",
            Self::SUCCESS => "SUCCESS",
            Self::SIGN_IN_REQUIRED => "SIGN_IN_REQUIRED",
            Self::INVALID_ACCOUNT => "INVALID_ACCOUNT",
            Self::NETWORK_ERROR => "NETWORK_ERROR",
            Self::INTERNAL_ERROR => "INTERNAL_ERROR",
            Self::DEVELOPER_ERROR => "DEVELOPER_ERROR",
            Self::TIMEOUT => "TIMEOUT",
            Self::CANCELED => "CANCELED",
            Self::SIGN_IN_FAILED => "SIGN_IN_FAILED",
            Self::SIGN_IN_CANCELLED => "SIGN_IN_CANCELLED",
            Self::SIGN_IN_CURRENTLY_IN_PROGRESS => "SIGN_IN_CURRENTLY_IN_PROGRESS",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}
