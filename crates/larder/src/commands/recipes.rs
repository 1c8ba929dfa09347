//! `larder recipes` commands.

use clap::Subcommand;

use super::Context;
use super::foods::SearchArgs;
use crate::error::CliError;
use crate::output::Output;

/// Recipe commands.
#[derive(Subcommand)]
pub(crate) enum RecipesCommand {
    /// Search recipes by name.
    Search(SearchArgs),
    /// Show a recipe.
    Get {
        /// Provider recipe id.
        recipe_id: String,
    },
}

impl RecipesCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let client = ctx.api_client();
        let result = match self {
            Self::Search(args) => client.search_recipes(&args.to_query())?,
            Self::Get { recipe_id } => client.get_recipe(&recipe_id)?,
        };
        Output::new().json(&result)
    }
}
