//! `larder call` command: pass an arbitrary method through the signer.

use std::collections::BTreeMap;

use clap::Args;
use larder_api::Scope;
use larder_oauth::oauth::Method;

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for `call`.
#[derive(Args)]
pub(crate) struct CallArgs {
    /// API method name, e.g. `foods.autocomplete`.
    method: String,

    /// Parameters as key=value.
    #[arg(value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Sign with the user's access token.
    #[arg(long)]
    user: bool,

    /// Send as POST instead of GET.
    #[arg(long)]
    post: bool,
}

impl CallArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let scope = if self.user { Scope::User } else { Scope::Public };
        let http_method = if self.post { Method::Post } else { Method::Get };
        let params: BTreeMap<String, String> = self.params.into_iter().collect();

        let body = ctx
            .api_client()
            .call(&self.method, params, scope, http_method)?;
        Output::new().json(&body.into_json())
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}
