//! Provider integration request configuration
//!
//! A `ProviderConfig` is the immutable description of what a single launch of
//! the provider surface asks for: additional scopes, an optional pinned
//! account and the web client id an ID token should be minted for.

use crate::settings::ProviderSettings;
use crate::utils::non_blank;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Scopes every Google sign-in request carries before additional scopes
pub const BASE_SCOPES: &[&str] = &["openid", "email", "profile"];

/// Configuration errors raised while building provider configuration or loading settings
#[derive(Debug)]
pub enum ConfigError {
    /// A requested scope was empty or whitespace
    InvalidScope(String),
    /// No provider with the given name is configured
    UnknownProvider(String),
    /// The provider is configured but disabled
    ProviderDisabled(String),
    /// A settings file could not be read
    Io(String),
    /// A settings file could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidScope(scope) => write!(f, "Invalid scope: {scope:?}"),
            ConfigError::UnknownProvider(name) => write!(f, "Unknown provider: {name}"),
            ConfigError::ProviderDisabled(name) => write!(f, "Provider {name} is disabled"),
            ConfigError::Io(msg) => write!(f, "Failed to read settings: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Failed to parse settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Immutable provider request configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProviderConfig {
    scopes: BTreeSet<String>,
    account_hint: Option<String>,
    client_id: Option<String>,
}

impl ProviderConfig {
    /// Create a configuration requesting the given additional scopes
    ///
    /// Duplicate scopes collapse into one entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidScope` if any scope is empty or whitespace
    pub fn new<I, S>(scopes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected = BTreeSet::new();
        for scope in scopes {
            let scope = scope.into();
            if scope.trim().is_empty() {
                return Err(ConfigError::InvalidScope(scope));
            }
            collected.insert(scope);
        }

        Ok(Self {
            scopes: collected,
            account_hint: None,
            client_id: None,
        })
    }

    /// Build the configuration described by provider settings
    ///
    /// # Errors
    ///
    /// Returns an error if a configured scope is blank
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(settings.scopes.iter().cloned())?
            .with_account_hint(settings.account_hint.as_deref())
            .with_client_id(settings.get_client_id().as_deref()))
    }

    /// Pin the request to an account; empty or whitespace hints mean "no hint"
    #[must_use]
    pub fn with_account_hint(mut self, hint: Option<&str>) -> Self {
        self.account_hint = non_blank(hint);
        self
    }

    /// Request an ID token minted for this web client id
    #[must_use]
    pub fn with_client_id(mut self, client_id: Option<&str>) -> Self {
        self.client_id = non_blank(client_id);
        self
    }

    /// Copy of this configuration with the account hint removed
    #[must_use]
    pub fn without_account_hint(&self) -> Self {
        Self {
            account_hint: None,
            ..self.clone()
        }
    }

    /// Additional scopes requested on top of the base sign-in scopes
    #[must_use]
    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }

    /// Every scope the provider surface is asked for
    #[must_use]
    pub fn effective_scopes(&self) -> BTreeSet<String> {
        BASE_SCOPES
            .iter()
            .map(ToString::to_string)
            .chain(self.scopes.iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn account_hint(&self) -> Option<&str> {
        self.account_hint.as_deref()
    }

    #[must_use]
    pub fn has_account_hint(&self) -> bool {
        self.account_hint.is_some()
    }

    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Whether the provider is asked to return an ID token
    #[must_use]
    pub fn requests_id_token(&self) -> bool {
        self.client_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_are_deduplicated() {
        let config = ProviderConfig::new(["drive.file", "calendar", "drive.file"]).unwrap();
        assert_eq!(config.scopes().len(), 2);
        assert!(config.scopes().contains("calendar"));
    }

    #[test]
    fn test_blank_scope_rejected() {
        let err = ProviderConfig::new(["calendar", "  "]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScope(_)));
    }

    #[test]
    fn test_empty_hint_means_no_hint() {
        let empty: [&str; 0] = [];
        let config = ProviderConfig::new(empty).unwrap().with_account_hint(Some(""));
        assert!(!config.has_account_hint());

        let config = config.with_account_hint(Some(" a@x.com "));
        assert_eq!(config.account_hint(), Some("a@x.com"));
    }

    #[test]
    fn test_without_account_hint_keeps_everything_else() {
        let config = ProviderConfig::new(["calendar"])
            .unwrap()
            .with_account_hint(Some("a@x.com"))
            .with_client_id(Some("web-client"));

        let stripped = config.without_account_hint();
        assert_eq!(stripped.account_hint(), None);
        assert_eq!(stripped.scopes(), config.scopes());
        assert_eq!(stripped.client_id(), Some("web-client"));
        // The original is untouched
        assert_eq!(config.account_hint(), Some("a@x.com"));
    }

    #[test]
    fn test_effective_scopes_include_base_scopes() {
        let config = ProviderConfig::new(["calendar", "email"]).unwrap();
        let effective = config.effective_scopes();
        assert_eq!(effective.len(), 4);
        for scope in BASE_SCOPES {
            assert!(effective.contains(*scope));
        }
    }

    #[test]
    fn test_id_token_requested_only_with_client_id() {
        let empty: [&str; 0] = [];
        let config = ProviderConfig::new(empty).unwrap();
        assert!(!config.requests_id_token());
        assert!(config.with_client_id(Some("web-client")).requests_id_token());
    }

    #[test]
    fn test_from_settings() {
        let settings = ProviderSettings {
            scopes: vec!["calendar".to_string()],
            account_hint: Some("a@x.com".to_string()),
            client_id: Some("web-client".to_string()),
            ..Default::default()
        };

        let config = ProviderConfig::from_settings(&settings).unwrap();
        assert!(config.scopes().contains("calendar"));
        assert_eq!(config.account_hint(), Some("a@x.com"));
        assert_eq!(config.client_id(), Some("web-client"));
    }
}
