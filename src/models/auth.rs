//! Authentication outcome and error types
//!
//! This module provides the consumer-facing failure type delivered through
//! `AuthCallback::on_failure`, plus the errors raised while normalizing a
//! provider payload or preparing a credential for the backend exchange.

use crate::provider::StatusCode;
use std::fmt;

/// Why a logical login request ended without an identity
///
/// Every variant has a stable tag so the host can tell a configuration
/// warning apart from an ordinary sign-in failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The provider delivered no result at all
    NoResult,
    /// A result was delivered but carried no usable payload
    MalformedResult(String),
    /// The provider rejected the account again after the hint was dropped
    AccountMismatch { message: String },
    /// The application is misconfigured for this provider
    Misconfiguration { code: StatusCode, message: String },
    /// Any other provider-reported failure
    ProviderFailure { code: StatusCode, message: String },
}

impl FailureReason {
    /// Stable machine-readable tag
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            FailureReason::NoResult => "no_result",
            FailureReason::MalformedResult(_) => "malformed_result",
            FailureReason::AccountMismatch { .. } => "account_mismatch",
            FailureReason::Misconfiguration { .. } => "misconfiguration",
            FailureReason::ProviderFailure { .. } => "provider_failure",
        }
    }

    /// Whether the host should surface this as a configuration warning
    #[must_use]
    pub fn is_configuration_warning(&self) -> bool {
        matches!(self, FailureReason::Misconfiguration { .. })
    }

    /// Provider status code, when the failure came from one
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            FailureReason::Misconfiguration { code, .. }
            | FailureReason::ProviderFailure { code, .. } => Some(*code),
            FailureReason::AccountMismatch { .. } => Some(StatusCode::INVALID_ACCOUNT),
            FailureReason::NoResult | FailureReason::MalformedResult(_) => None,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoResult => write!(f, "No result found"),
            FailureReason::MalformedResult(msg) => write!(f, "Malformed result: {msg}"),
            FailureReason::AccountMismatch { message } => {
                write!(f, "Account rejected by provider: {message}")
            }
            FailureReason::Misconfiguration { message, .. } => {
                write!(f, "Developer error: {message}")
            }
            FailureReason::ProviderFailure { message, .. } => write!(f, "{message}"),
        }
    }
}

/// Errors raised while normalizing a provider success payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The payload carries no unique user identifier
    MissingUniqueKey,
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::MissingUniqueKey => {
                write!(f, "Provider payload is missing the account email")
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Errors raised while preparing a credential for the identity backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The identity was produced without an ID token
    MissingIdToken(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::MissingIdToken(provider) => {
                write!(f, "No ID token available for provider {provider}")
            }
        }
    }
}

impl std::error::Error for CredentialError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_tags_are_distinct() {
        let reasons = [
            FailureReason::NoResult,
            FailureReason::MalformedResult("x".to_string()),
            FailureReason::AccountMismatch {
                message: "5 INVALID_ACCOUNT".to_string(),
            },
            FailureReason::Misconfiguration {
                code: StatusCode::DEVELOPER_ERROR,
                message: "10 DEVELOPER_ERROR".to_string(),
            },
            FailureReason::ProviderFailure {
                code: StatusCode::NETWORK_ERROR,
                message: "7 offline".to_string(),
            },
        ];

        let tags: std::collections::HashSet<_> = reasons.iter().map(FailureReason::tag).collect();
        assert_eq!(tags.len(), reasons.len());
    }

    #[test]
    fn test_only_misconfiguration_is_configuration_warning() {
        let misconfigured = FailureReason::Misconfiguration {
            code: StatusCode::DEVELOPER_ERROR,
            message: "10 DEVELOPER_ERROR".to_string(),
        };
        let generic = FailureReason::ProviderFailure {
            code: StatusCode::SIGN_IN_CANCELLED,
            message: "12501 SIGN_IN_CANCELLED".to_string(),
        };

        assert!(misconfigured.is_configuration_warning());
        assert!(!generic.is_configuration_warning());
        assert!(!FailureReason::NoResult.is_configuration_warning());
    }

    #[test]
    fn test_status_code_exposed() {
        let generic = FailureReason::ProviderFailure {
            code: StatusCode::TIMEOUT,
            message: "15 TIMEOUT".to_string(),
        };
        assert_eq!(generic.status_code(), Some(StatusCode::TIMEOUT));
        assert_eq!(FailureReason::NoResult.status_code(), None);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(FailureReason::NoResult.to_string(), "No result found");
        let generic = FailureReason::ProviderFailure {
            code: StatusCode::NETWORK_ERROR,
            message: "7 offline".to_string(),
        };
        assert_eq!(generic.to_string(), "7 offline");
    }
}
