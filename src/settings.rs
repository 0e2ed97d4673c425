use crate::adapter::ConcurrentLoginPolicy;
use crate::provider::{ConfigError, GOOGLE_PROVIDER_ID};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the settings file looked up in the working and secrets directories
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdpSettings {
    pub logging: LoggingSettings,
    pub adapter: AdapterSettings,
    pub providers: Vec<ProviderSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// What a second `start_login` does while a sign-in is outstanding
    pub concurrent_login: ConcurrentLoginPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub name: String,
    pub display_name: Option<String>,
    pub icon: Option<String>,
    /// Additional scopes requested on top of the base sign-in scopes
    pub scopes: Vec<String>,
    /// Previously known account used to skip the account chooser
    pub account_hint: Option<String>,

    // Direct value (can be overridden by environment variable)
    pub client_id: Option<String>,

    // Environment variable name for override
    pub client_id_env: Option<String>,

    pub enabled: bool,
}

impl Default for IdpSettings {
    fn default() -> Self {
        Self {
            logging: LoggingSettings::default(),
            adapter: AdapterSettings::default(),
            providers: vec![ProviderSettings::default()],
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: GOOGLE_PROVIDER_ID.to_string(),
            display_name: None,
            icon: None,
            scopes: Vec::new(),
            account_hint: None,
            client_id: None,
            client_id_env: Some("GOOGLE_WEB_CLIENT_ID".to_string()),
            enabled: true,
        }
    }
}

impl IdpSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Settings.toml in `IDP_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// The logger is initialised with the resulting log level.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_env_file();

        let (mut settings, sources) = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        Self::initialize_logging(&settings.logging);
        for source in sources {
            info!("✓ Loaded settings from {}", source.display());
        }

        Ok(settings)
    }

    /// Parse settings from TOML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is not valid settings TOML
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        basic_toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let toml_content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&toml_content)
    }

    fn initialize_logging(logging: &LoggingSettings) {
        let env = env_logger::Env::default().default_filter_or(logging.level.as_str());
        if env_logger::Builder::from_env(env).try_init().is_err() {
            debug!("Logger already initialised");
        }
    }

    /// Load base settings from TOML file(s) or use defaults, returning the files that were used
    fn load_base_settings() -> Result<(Self, Vec<PathBuf>), ConfigError> {
        let mut settings = Self::default();
        let mut sources = Vec::new();

        let default_config_path = PathBuf::from(SETTINGS_FILE);
        if default_config_path.exists() {
            settings = Self::from_file(&default_config_path)?;
            sources.push(default_config_path);
        }

        // A secrets directory replaces the working directory settings entirely
        if let Ok(secrets_dir) = std::env::var("IDP_SECRETS_DIR") {
            let secrets_path = Path::new(&secrets_dir).join(SETTINGS_FILE);
            if secrets_path.exists() {
                settings = Self::from_file(&secrets_path)?;
                sources.push(secrets_path);
            }
        }

        Ok((settings, sources))
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_logging_env_overrides(&mut settings.logging);
        Self::apply_adapter_env_overrides(&mut settings.adapter);
        Self::apply_provider_env_overrides(&mut settings.providers);
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    fn apply_adapter_env_overrides(adapter_settings: &mut AdapterSettings) {
        if let Ok(policy_str) = std::env::var("IDP_CONCURRENT_LOGIN") {
            match policy_str.parse::<ConcurrentLoginPolicy>() {
                Ok(policy) => adapter_settings.concurrent_login = policy,
                Err(e) => warn!("Ignoring IDP_CONCURRENT_LOGIN: {e}"),
            }
        }
    }

    fn apply_provider_env_overrides(providers: &mut [ProviderSettings]) {
        if let Ok(hint) = std::env::var("IDP_ACCOUNT_HINT") {
            for provider in providers
                .iter_mut()
                .filter(|p| p.name == GOOGLE_PROVIDER_ID)
            {
                provider.account_hint = Some(hint.clone());
            }
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get provider by name
    #[must_use]
    pub fn get_provider(&self, name: &str) -> Option<&ProviderSettings> {
        self.providers.iter().find(|p| p.name == name)
    }
}

impl ProviderSettings {
    /// Get the client ID, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_client_id(&self) -> Option<String> {
        if let Some(env_var) = &self.client_id_env {
            if let Ok(value) = std::env::var(env_var) {
                return Some(value);
            }
        }
        self.client_id.clone()
    }
}
