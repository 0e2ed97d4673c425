//! Provider integration module
//!
//! This module holds everything that describes a provider integration request
//! and the raw results the provider surface hands back: configuration, status
//! codes, result payloads and the display metadata the host shell renders.

pub mod config;
pub mod result;
pub mod status;

pub use config::{ConfigError, ProviderConfig, BASE_SCOPES};
pub use result::{ProviderStatus, RawSignInResult, SignInAccount};
pub use status::StatusCode;

use crate::settings::ProviderSettings;
use serde::Serialize;

/// Provider identifier stamped on every identity produced by the Google adapter
pub const GOOGLE_PROVIDER_ID: &str = "google";

/// Display metadata the host shell uses to render a provider's sign-in button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
    pub id: String,
    pub display_name: String,
    pub icon: String,
}

impl ProviderDescriptor {
    #[must_use]
    pub fn google() -> Self {
        Self {
            id: GOOGLE_PROVIDER_ID.to_string(),
            display_name: "Google".to_string(),
            icon: "idp_button_google".to_string(),
        }
    }

    /// Google descriptor with display overrides from settings
    #[must_use]
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        let defaults = Self::google();
        Self {
            id: defaults.id,
            display_name: settings
                .display_name
                .clone()
                .unwrap_or(defaults.display_name),
            icon: settings.icon.clone().unwrap_or(defaults.icon),
        }
    }
}
