//! Raw sign-in results as delivered by the provider surface
//!
//! These types mirror what the provider SDK hands back once its consent
//! surface completes. They are deliberately loose (every account field is
//! optional) because classification and normalization decide what is usable.

use crate::provider::status::StatusCode;
use serde::{Deserialize, Serialize};

/// Status half of a provider result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub code: StatusCode,
    #[serde(default)]
    pub message: Option<String>,
}

impl ProviderStatus {
    #[must_use]
    pub fn success() -> Self {
        Self {
            code: StatusCode::SUCCESS,
            message: None,
        }
    }

    #[must_use]
    pub fn new(code: StatusCode, message: Option<&str>) -> Self {
        Self {
            code,
            message: message.map(ToString::to_string),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Human-readable "code message" string used in failure reasons
    #[must_use]
    pub fn describe(&self) -> String {
        let message = self
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .or_else(|| self.code.name())
            .unwrap_or("unknown status");
        format!("{} {message}", self.code)
    }
}

/// Account payload of a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignInAccount {
    pub id: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub id_token: Option<String>,
}

/// Complete result delivered for one launch of the provider surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignInResult {
    pub status: ProviderStatus,
    #[serde(default)]
    pub account: Option<SignInAccount>,
}

impl RawSignInResult {
    #[must_use]
    pub fn success(account: SignInAccount) -> Self {
        Self {
            status: ProviderStatus::success(),
            account: Some(account),
        }
    }

    #[must_use]
    pub fn failure(code: StatusCode, message: Option<&str>) -> Self {
        Self {
            status: ProviderStatus::new(code, message),
            account: None,
        }
    }

    /// Parse a result from the JSON form hosts receive from the provider bridge
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or lacks a status
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
