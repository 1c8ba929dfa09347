//! Error types for OAuth signing, token exchange and credential storage.

use std::fmt;

/// Handshake leg that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// Leg 1: temporary credentials.
    RequestToken,
    /// Leg 3: verifier exchange.
    AccessToken,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestToken => f.write_str("request token"),
            Self::AccessToken => f.write_str("access token"),
        }
    }
}

/// Error from OAuth operations.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Consumer key/secret or access token is not configured.
    #[error("missing {0}; run `larder credentials set` and `larder auth login` first")]
    MissingCredentials(&'static str),

    /// Provider response for a handshake leg was unusable. Start a fresh leg.
    #[error("{leg} exchange failed: {message}")]
    Handshake {
        /// Leg that failed.
        leg: Leg,
        /// What was wrong with the response.
        message: String,
    },

    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Raw response body (provider diagnostics).
        body: String,
    },

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Atomic rename of the credential file failed.
    #[error("failed to persist credentials")]
    Persist(#[from] tempfile::PersistError),
}

impl OAuthError {
    pub(crate) fn handshake(leg: Leg, message: impl Into<String>) -> Self {
        Self::Handshake {
            leg,
            message: message.into(),
        }
    }
}
