//! CLI error types.

use larder_api::ApiError;
use larder_config::ConfigError;
use larder_oauth::OAuthError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    OAuth(#[from] OAuthError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Validation(String),
}
