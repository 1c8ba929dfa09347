//! FatSecret Platform API client for Larder.
//!
//! - [`FatSecretClient`]: signed calls to the REST endpoint
//! - [`date_to_days`]: the provider's day-number date encoding
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use larder_api::{FatSecretClient, SearchQuery};
//! use larder_config::Config;
//!
//! let config = Config::load(None, None)?;
//! let client = FatSecretClient::from_config(&config);
//! let foods = client.search_foods(&SearchQuery::new("oatmeal"))?;
//! println!("{foods}");
//! # Ok(())
//! # }
//! ```

mod client;
mod date;
mod error;
mod types;

pub use client::{FatSecretClient, Scope};
pub use date::date_to_days;
pub use error::ApiError;
pub use types::{Meal, NewFoodEntry, SearchQuery};
