//! `larder profile` command.

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Show the authorized user's profile.
pub(crate) fn execute(ctx: &Context) -> Result<(), CliError> {
    let profile = ctx.api_client().profile()?;
    Output::new().json(&profile)
}
