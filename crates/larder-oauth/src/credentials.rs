//! Persisted OAuth credentials.
//!
//! The credential file is a JSON object:
//!
//! ```json
//! {
//!   "clientId": "...",
//!   "clientSecret": "...",
//!   "accessToken": "...",
//!   "accessTokenSecret": "...",
//!   "userId": "..."
//! }
//! ```
//!
//! Unknown fields are ignored and missing optional fields stay absent.
//! Writes go to a temporary file in the same directory that is then renamed
//! over the target, so readers see either the old or the new file. There is
//! no locking: with concurrent writers the last rename wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use larder_config::CredentialsConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::OAuthError;
use crate::oauth::{AccessToken, Consumer, TokenPair};

/// Consumer credentials plus the optional user access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Credentials {
    /// Consumer key and secret, required for any signed request.
    pub fn consumer(&self) -> Result<Consumer<'_>, OAuthError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(OAuthError::MissingCredentials("consumer key/secret"));
        }
        Ok(Consumer {
            key: &self.client_id,
            secret: &self.client_secret,
        })
    }

    /// Access token and secret, if the user has authorized.
    pub fn access(&self) -> Option<TokenPair<'_>> {
        match (&self.access_token, &self.access_token_secret) {
            (Some(token), Some(secret)) if !token.is_empty() && !secret.is_empty() => {
                Some(TokenPair { token, secret })
            }
            _ => None,
        }
    }

    /// Like [`Credentials::access`], but missing tokens are an error.
    pub fn require_access(&self) -> Result<TokenPair<'_>, OAuthError> {
        self.access()
            .ok_or(OAuthError::MissingCredentials("access token"))
    }

    /// Replace the user token fields with a freshly exchanged access token.
    pub fn apply_access_token(&mut self, token: &AccessToken) {
        self.access_token = Some(token.oauth_token.clone());
        self.access_token_secret = Some(token.oauth_token_secret.clone());
        self.user_id.clone_from(&token.user_id);
    }
}

/// JSON credential file with defaults from process configuration.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    defaults: Credentials,
}

impl CredentialStore {
    /// Create a store at `path`; `defaults` apply to fields the file lacks.
    pub fn new(path: impl Into<PathBuf>, defaults: Credentials) -> Self {
        Self {
            path: path.into(),
            defaults,
        }
    }

    /// Create a store from resolved configuration.
    pub fn from_config(config: &CredentialsConfig) -> Self {
        let defaults = Credentials {
            client_id: config.consumer_key.clone().unwrap_or_default(),
            client_secret: config.consumer_secret.clone().unwrap_or_default(),
            ..Credentials::default()
        };
        Self::new(&config.path, defaults)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load credentials, shallow-merging the file over the defaults.
    ///
    /// A missing or unparsable file yields the defaults; this is the
    /// first-run state rather than an error.
    pub fn load(&self) -> Credentials {
        match self.read_file() {
            Ok(Some(file)) => self.merge(file),
            Ok(None) => self.defaults.clone(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable credential file"
                );
                self.defaults.clone()
            }
        }
    }

    /// Overwrite the credential file atomically.
    pub fn save(&self, credentials: &Credentials) -> Result<(), OAuthError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // NamedTempFile is created with owner-only permissions.
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, credentials)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;

        info!(path = %self.path.display(), "Saved credentials");
        Ok(())
    }

    /// Load, modify and save in one step. Returns the saved credentials.
    pub fn update(
        &self,
        apply: impl FnOnce(&mut Credentials),
    ) -> Result<Credentials, OAuthError> {
        let mut credentials = self.load();
        apply(&mut credentials);
        self.save(&credentials)?;
        Ok(credentials)
    }

    fn read_file(&self) -> Result<Option<Value>, OAuthError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn merge(&self, file: Value) -> Credentials {
        let Value::Object(overrides) = file else {
            warn!(path = %self.path.display(), "Credential file is not a JSON object");
            return self.defaults.clone();
        };

        let mut merged = match serde_json::to_value(&self.defaults) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        for (key, value) in overrides {
            if !value.is_null() {
                merged.insert(key, value);
            }
        }

        serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Malformed credential file");
            self.defaults.clone()
        })
    }
}
