//! `larder status` command.

use larder_oauth::oauth::AuthState;
use serde_json::json;

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Report where the local installation stands in the authorization flow.
pub(crate) fn execute(ctx: &Context) -> Result<(), CliError> {
    let credentials = ctx.store.load();
    let state = match AuthState::from_credentials(&credentials) {
        AuthState::NoCredentials => "no_credentials",
        AuthState::CredentialsSet | AuthState::RequestTokenObtained(_) => "credentials_set",
        AuthState::AccessTokenObtained => "authorized",
    };

    Output::new().json(&json!({
        "state": state,
        "credentials_path": ctx.store.path(),
        "config_path": ctx.config.config_path,
        "user_id": credentials.user_id,
    }))
}
