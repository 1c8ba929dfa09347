//! `larder foods` commands.

use clap::{Args, Subcommand};
use larder_api::SearchQuery;

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Food database commands.
#[derive(Subcommand)]
pub(crate) enum FoodsCommand {
    /// Search foods by name.
    Search(SearchArgs),
    /// Show a food and its servings.
    Get {
        /// Provider food id.
        food_id: String,
    },
}

/// Search arguments shared with `recipes search`.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Search text.
    query: String,

    /// Zero-based result page.
    #[arg(long)]
    page: Option<u32>,

    /// Results per page (1-50).
    #[arg(long)]
    max_results: Option<u32>,
}

impl SearchArgs {
    pub(crate) fn to_query(&self) -> SearchQuery {
        SearchQuery {
            expression: self.query.clone(),
            page_number: self.page,
            max_results: self.max_results,
        }
    }
}

impl FoodsCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let client = ctx.api_client();
        let result = match self {
            Self::Search(args) => client.search_foods(&args.to_query())?,
            Self::Get { food_id } => client.get_food(&food_id)?,
        };
        Output::new().json(&result)
    }
}
