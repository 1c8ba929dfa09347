//! `larder auth` commands.
//!
//! `login` walks all three legs interactively. `start` and `finish` run leg 1
//! and leg 3 as separate invocations; the request token travels between them
//! through the caller.

use std::io::{self, Write};

use clap::{Args, Subcommand};
use larder_oauth::oauth::{AuthFlow, RequestToken};
use serde_json::json;

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// OAuth authorization commands.
#[derive(Subcommand)]
pub(crate) enum AuthCommand {
    /// Authorize interactively: open a URL, paste the verifier code.
    Login,
    /// Leg 1 only: print a request token and authorization URL as JSON.
    Start,
    /// Leg 3 only: exchange a request token and verifier for an access token.
    Finish(FinishArgs),
}

/// Arguments for `auth finish`.
#[derive(Args)]
pub(crate) struct FinishArgs {
    /// Request token printed by `auth start`.
    #[arg(long)]
    token: String,

    /// Request token secret printed by `auth start`.
    #[arg(long)]
    secret: String,

    /// Verifier code shown after authorizing in the browser.
    #[arg(long)]
    verifier: String,
}

impl AuthCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            Self::Login => login(ctx),
            Self::Start => start(ctx),
            Self::Finish(args) => args.execute(ctx),
        }
    }
}

fn login(ctx: &Context) -> Result<(), CliError> {
    let output = Output::new();
    let mut flow = AuthFlow::new(ctx.token_exchange(), &ctx.store);

    // Step 1: Get request token
    output.info("Step 1: Requesting temporary credentials...");
    let auth_url = flow.begin()?;
    output.success("Temporary token received");

    // Step 2: User authorization
    output.separator();
    output.highlight("Step 2: Authorization Required");
    output.separator();
    output.info("\nPlease open this URL in your browser:");
    output.highlight(&format!("\n{auth_url}\n"));

    write!(io::stderr(), "Enter the verification code: ")?;
    io::stderr().flush()?;
    let mut verifier = String::new();
    io::stdin().read_line(&mut verifier)?;

    // Step 3: Exchange for access token
    output.info("\nStep 3: Exchanging for access token...");
    let credentials = flow.finish(&verifier)?;

    output.separator();
    output.success("OAuth Authorization Successful!");
    output.separator();
    if let Some(user_id) = &credentials.user_id {
        output.info(&format!("User id: {user_id}"));
    } else {
        output.warning("Provider did not return a user id.");
    }
    output.info(&format!(
        "Access token saved to {}",
        ctx.store.path().display()
    ));
    Ok(())
}

fn start(ctx: &Context) -> Result<(), CliError> {
    let exchange = ctx.token_exchange();
    let request_token = exchange.request_token(&ctx.store.load())?;
    let authorization_url = exchange.authorization_url(&request_token);

    Output::new().json(&json!({
        "oauth_token": request_token.oauth_token,
        "oauth_token_secret": request_token.oauth_token_secret,
        "authorization_url": authorization_url,
    }))
}

impl FinishArgs {
    fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let request_token = RequestToken {
            oauth_token: self.token,
            oauth_token_secret: self.secret,
            callback_confirmed: None,
        };
        let credentials = ctx
            .token_exchange()
            .complete(&ctx.store, &request_token, &self.verifier)?;

        Output::new().json(&json!({
            "authorized": true,
            "user_id": credentials.user_id,
        }))
    }
}
