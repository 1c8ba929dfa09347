//! Configuration management for Larder.
//!
//! Parses `larder.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `provider.*` URLs
//! - `credentials.path` (also tilde-expanded)
//! - `credentials.consumer_key`
//! - `credentials.consumer_secret`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override credential file location.
    pub credentials_path: Option<PathBuf>,
    /// Override the default consumer key.
    pub consumer_key: Option<String>,
    /// Override the default consumer secret.
    pub consumer_secret: Option<String>,
    /// Override HTTP timeout in seconds (0 disables the timeout).
    pub timeout_secs: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "larder.toml";

/// Default credential file location, relative to the home directory.
const DEFAULT_CREDENTIALS_PATH: &str = "~/.config/larder/credentials.json";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider endpoints.
    pub provider: ProviderConfig,
    /// Credential file settings as parsed from TOML.
    credentials: CredentialsConfigRaw,
    /// HTTP client settings.
    pub http: HttpConfig,

    /// Resolved credential settings (set after loading).
    #[serde(skip)]
    pub credentials_resolved: CredentialsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// OAuth and REST endpoints of the nutrition provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Leg 1 endpoint (POST).
    pub request_token_url: String,
    /// Browser authorization page.
    pub authorize_url: String,
    /// Leg 3 endpoint (GET).
    pub access_token_url: String,
    /// Single REST endpoint taking a `method` parameter.
    pub api_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            request_token_url: "https://authentication.fatsecret.com/oauth/request_token"
                .to_owned(),
            authorize_url: "https://authentication.fatsecret.com/oauth/authorize".to_owned(),
            access_token_url: "https://authentication.fatsecret.com/oauth/access_token"
                .to_owned(),
            api_url: "https://platform.fatsecret.com/rest/server.api".to_owned(),
        }
    }
}

/// Raw credential settings as parsed from TOML (path as string).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CredentialsConfigRaw {
    path: Option<String>,
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
}

/// Resolved credential settings.
#[derive(Debug, Clone)]
pub struct CredentialsConfig {
    /// Location of the persisted credential JSON file.
    pub path: PathBuf,
    /// Consumer key used when the credential file does not provide one.
    pub consumer_key: Option<String>,
    /// Consumer secret used when the credential file does not provide one.
    pub consumer_secret: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(shellexpand::tilde(DEFAULT_CREDENTIALS_PATH).into_owned()),
            consumer_key: None,
            consumer_secret: None,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Global request timeout in seconds. `0` leaves requests unbounded.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl HttpConfig {
    /// Timeout as a [`Duration`], or `None` when disabled.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`credentials.consumer_key`").
        field: String,
        /// Error message (e.g., "${`FATSECRET_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `larder.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(path) = &settings.credentials_path {
            self.credentials_resolved.path.clone_from(path);
        }
        if let Some(key) = &settings.consumer_key {
            self.credentials_resolved.consumer_key = Some(key.clone());
        }
        if let Some(secret) = &settings.consumer_secret {
            self.credentials_resolved.consumer_secret = Some(secret.clone());
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.http.timeout_secs = timeout_secs;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Expand environment variables and resolve the credential path.
    ///
    /// A relative credential path is resolved against the config file's directory.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let provider = &mut self.provider;
        provider.request_token_url =
            expand::expand_env(&provider.request_token_url, "provider.request_token_url")?;
        provider.authorize_url =
            expand::expand_env(&provider.authorize_url, "provider.authorize_url")?;
        provider.access_token_url =
            expand::expand_env(&provider.access_token_url, "provider.access_token_url")?;
        provider.api_url = expand::expand_env(&provider.api_url, "provider.api_url")?;

        let path = match &self.credentials.path {
            Some(raw) => config_dir.join(expand::expand_path(raw, "credentials.path")?),
            None => CredentialsConfig::default().path,
        };
        let consumer_key = self
            .credentials
            .consumer_key
            .as_deref()
            .map(|v| expand::expand_env(v, "credentials.consumer_key"))
            .transpose()?;
        let consumer_secret = self
            .credentials
            .consumer_secret
            .as_deref()
            .map(|v| expand::expand_env(v, "credentials.consumer_secret"))
            .transpose()?;

        self.credentials_resolved = CredentialsConfig {
            path,
            consumer_key,
            consumer_secret,
        };
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoints = [
            (&self.provider.request_token_url, "provider.request_token_url"),
            (&self.provider.authorize_url, "provider.authorize_url"),
            (&self.provider.access_token_url, "provider.access_token_url"),
            (&self.provider.api_url, "provider.api_url"),
        ];
        for (url, field) in endpoints {
            require_non_empty(url, field)?;
            require_http_url(url, field)?;
        }
        Ok(())
    }
}
