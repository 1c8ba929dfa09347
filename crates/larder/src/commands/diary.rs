//! `larder diary` commands.

use clap::{Args, Subcommand};
use larder_api::{Meal, NewFoodEntry};

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Food diary commands (require authorization).
#[derive(Subcommand)]
pub(crate) enum DiaryCommand {
    /// List entries for a day.
    List {
        /// Day as YYYY-MM-DD (default: today).
        #[arg(long)]
        date: Option<String>,
    },
    /// Add an entry.
    Add(AddArgs),
}

/// Arguments for `diary add`.
#[derive(Args)]
pub(crate) struct AddArgs {
    /// Provider food id.
    #[arg(long)]
    food_id: String,

    /// Serving id from `foods get`.
    #[arg(long)]
    serving_id: String,

    /// Number of servings.
    #[arg(long, default_value_t = 1.0)]
    units: f64,

    /// breakfast, lunch, dinner or other.
    #[arg(long)]
    meal: String,

    /// Entry name shown in the diary.
    #[arg(long)]
    name: String,

    /// Day as YYYY-MM-DD (default: today).
    #[arg(long)]
    date: Option<String>,
}

impl DiaryCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let client = ctx.api_client();
        let result = match self {
            Self::List { date } => client.food_entries(date.as_deref())?,
            Self::Add(args) => {
                let entry = NewFoodEntry {
                    food_id: args.food_id,
                    food_entry_name: args.name,
                    serving_id: args.serving_id,
                    number_of_units: args.units,
                    meal: args.meal.parse::<Meal>()?,
                    date: args.date,
                };
                client.create_food_entry(&entry)?
            }
        };
        Output::new().json(&result)
    }
}
