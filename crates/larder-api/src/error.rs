//! Error types for nutrition API calls.

use larder_oauth::OAuthError;

/// Error from API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Caller input rejected before any network call.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Signing, transport or credential failure.
    #[error(transparent)]
    OAuth(#[from] OAuthError),

    /// Provider answered 2xx with an `error` object.
    #[error("provider error {code}: {message}")]
    Provider {
        /// Provider error code.
        code: i64,
        /// Provider error message.
        message: String,
    },
}
