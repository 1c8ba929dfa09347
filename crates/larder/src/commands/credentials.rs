//! `larder credentials` commands.

use clap::{Args, Subcommand};
use larder_oauth::Credentials;
use serde_json::json;

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Credential management commands.
#[derive(Subcommand)]
pub(crate) enum CredentialsCommand {
    /// Store consumer credentials (and optionally an existing access token).
    Set(SetArgs),
    /// Show which credentials are configured (secrets masked).
    Show,
}

/// Arguments for `credentials set`.
#[derive(Args)]
pub(crate) struct SetArgs {
    /// OAuth consumer key from the provider's developer console.
    #[arg(long = "key")]
    key: String,

    /// OAuth consumer secret.
    #[arg(long = "secret")]
    secret: String,

    /// Existing access token.
    #[arg(long, requires = "access_token_secret")]
    access_token: Option<String>,

    /// Existing access token secret.
    #[arg(long, requires = "access_token")]
    access_token_secret: Option<String>,

    /// Provider user id for the access token.
    #[arg(long)]
    user_id: Option<String>,
}

impl CredentialsCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            Self::Set(args) => args.execute(ctx),
            Self::Show => show(ctx),
        }
    }
}

impl SetArgs {
    fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let output = Output::new();
        if self.key.trim().is_empty() || self.secret.trim().is_empty() {
            return Err(CliError::Validation(
                "consumer key and secret cannot be empty".to_owned(),
            ));
        }

        let saved = ctx.store.update(|c| self.apply(c))?;

        output.success(&format!(
            "Credentials saved to {}",
            ctx.store.path().display()
        ));
        if saved.access().is_none() {
            output.info("Run `larder auth login` to authorize user-scoped commands.");
        }
        Ok(())
    }

    /// Write the new consumer into `credentials`.
    ///
    /// An access token belongs to the consumer that obtained it, so a stored
    /// token is dropped when the consumer key changes and no token is given.
    fn apply(self, credentials: &mut Credentials) {
        if credentials.client_id != self.key {
            credentials.access_token = None;
            credentials.access_token_secret = None;
            credentials.user_id = None;
        }
        credentials.client_id = self.key;
        credentials.client_secret = self.secret;
        if let Some(token) = self.access_token {
            credentials.access_token = Some(token);
            credentials.access_token_secret = self.access_token_secret;
            credentials.user_id = self.user_id;
        }
    }
}

fn show(ctx: &Context) -> Result<(), CliError> {
    let credentials = ctx.store.load();
    Output::new().json(&json!({
        "path": ctx.store.path(),
        "clientId": mask(Some(credentials.client_id.as_str())),
        "clientSecret": mask(Some(credentials.client_secret.as_str())),
        "accessToken": mask(credentials.access_token.as_deref()),
        "accessTokenSecret": mask(credentials.access_token_secret.as_deref()),
        "userId": credentials.user_id,
    }))
}

/// Keep the first four characters of a long secret; hide short ones entirely.
fn mask(value: Option<&str>) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    if value.chars().count() <= MASK_MIN_LEN {
        return Some("…".to_owned());
    }
    let visible: String = value.chars().take(4).collect();
    Some(format!("{visible}…"))
}

/// Secrets up to this length are shown without any visible prefix.
const MASK_MIN_LEN: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mask() {
        assert_eq!(mask(Some("abcdef123")), Some("abcd…".to_owned()));
        assert_eq!(mask(Some("ab")), Some("…".to_owned()));
        assert_eq!(mask(Some("12345678")), Some("…".to_owned()));
        assert_eq!(mask(Some("")), None);
        assert_eq!(mask(None), None);
    }

    fn set_args(key: &str, access_token: Option<&str>) -> SetArgs {
        SetArgs {
            key: key.to_owned(),
            secret: "new-secret".to_owned(),
            access_token: access_token.map(str::to_owned),
            access_token_secret: access_token.map(|_| "ats".to_owned()),
            user_id: None,
        }
    }

    fn authorized() -> Credentials {
        Credentials {
            client_id: "ck".to_owned(),
            client_secret: "cs".to_owned(),
            access_token: Some("at".to_owned()),
            access_token_secret: Some("as".to_owned()),
            user_id: Some("u-1".to_owned()),
        }
    }

    #[test]
    fn test_set_new_consumer_drops_old_access_token() {
        let mut credentials = authorized();
        set_args("other-ck", None).apply(&mut credentials);

        assert_eq!(credentials.client_id, "other-ck");
        assert_eq!(credentials.client_secret, "new-secret");
        assert_eq!(credentials.access_token, None);
        assert_eq!(credentials.access_token_secret, None);
        assert_eq!(credentials.user_id, None);
    }

    #[test]
    fn test_set_same_consumer_keeps_access_token() {
        let mut credentials = authorized();
        set_args("ck", None).apply(&mut credentials);

        assert_eq!(credentials.client_secret, "new-secret");
        assert_eq!(credentials.access_token.as_deref(), Some("at"));
        assert_eq!(credentials.user_id.as_deref(), Some("u-1"));
    }

    #[test]
    fn test_set_new_consumer_with_token() {
        let mut credentials = authorized();
        set_args("other-ck", Some("new-at")).apply(&mut credentials);

        assert_eq!(credentials.access_token.as_deref(), Some("new-at"));
        assert_eq!(credentials.access_token_secret.as_deref(), Some("ats"));
    }
}
