//! Provider adapter module
//!
//! This module provides the sign-in state machine that launches a provider
//! surface, correlates its asynchronous result back to the attempt, applies
//! the retry policy and reports a normalized outcome to the consumer.

pub mod google;
pub mod traits;

pub use google::GoogleProviderAdapter;
pub use traits::{AuthCallback, HostShell, Notice, ProviderSurface};

use crate::session::CorrelationToken;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What `start_login` does while a session is still outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrentLoginPolicy {
    /// Invalidate the outstanding session and launch a new one
    #[default]
    Supersede,
    /// Refuse the new login and keep the outstanding session
    Reject,
}

impl FromStr for ConcurrentLoginPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supersede" => Ok(Self::Supersede),
            "reject" => Ok(Self::Reject),
            other => Err(format!("Unknown concurrent login policy: {other}")),
        }
    }
}

/// What happened to a delivered provider result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultDisposition {
    /// A terminal outcome was delivered to the callback
    Delivered,
    /// The provider surface was relaunched for the bounded retry
    Relaunched,
    /// The result did not belong to the outstanding session and was dropped
    Stale,
}

/// Precondition violations of adapter operations
#[derive(Debug)]
pub enum AdapterError {
    /// `start_login` was called before a callback was registered
    NoCallback,
    /// The adapter was disposed
    Disposed,
    /// A session is outstanding and the policy rejects a new login
    LoginInProgress(CorrelationToken),
    /// The callback cannot be replaced while a session is outstanding
    CallbackBusy,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::NoCallback => write!(f, "No authentication callback registered"),
            AdapterError::Disposed => write!(f, "Provider adapter has been disposed"),
            AdapterError::LoginInProgress(token) => {
                write!(f, "Sign-in already in progress (session {token})")
            }
            AdapterError::CallbackBusy => write!(
                f,
                "Cannot replace the authentication callback while a sign-in is outstanding"
            ),
        }
    }
}

impl std::error::Error for AdapterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "supersede".parse::<ConcurrentLoginPolicy>(),
            Ok(ConcurrentLoginPolicy::Supersede)
        );
        assert_eq!(
            " Reject ".parse::<ConcurrentLoginPolicy>(),
            Ok(ConcurrentLoginPolicy::Reject)
        );
        assert!("queue".parse::<ConcurrentLoginPolicy>().is_err());
    }

    #[test]
    fn test_policy_default_is_supersede() {
        assert_eq!(
            ConcurrentLoginPolicy::default(),
            ConcurrentLoginPolicy::Supersede
        );
    }
}
