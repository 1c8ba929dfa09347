//! Food diary operations (user-scoped).

use std::collections::BTreeMap;

use larder_oauth::oauth::Method;
use serde_json::Value;

use super::{FatSecretClient, Scope, require};
use crate::date::date_to_days;
use crate::error::ApiError;
use crate::types::NewFoodEntry;

impl FatSecretClient {
    /// Diary entries for a day (`food_entries.get`). `None` means today.
    pub fn food_entries(&self, date: Option<&str>) -> Result<Value, ApiError> {
        let params = BTreeMap::from([("date".to_owned(), date_to_days(date)?)]);
        self.get_user("food_entries.get", params)
    }

    /// Record a diary entry (`food_entry.create`).
    pub fn create_food_entry(&self, entry: &NewFoodEntry) -> Result<Value, ApiError> {
        require(&entry.food_id, "food_id")?;
        require(&entry.food_entry_name, "food_entry_name")?;
        require(&entry.serving_id, "serving_id")?;
        if !entry.number_of_units.is_finite() || entry.number_of_units <= 0.0 {
            return Err(ApiError::Validation(format!(
                "number_of_units must be positive, got {}",
                entry.number_of_units
            )));
        }

        let params = BTreeMap::from([
            ("food_id".to_owned(), entry.food_id.clone()),
            ("food_entry_name".to_owned(), entry.food_entry_name.clone()),
            ("serving_id".to_owned(), entry.serving_id.clone()),
            (
                "number_of_units".to_owned(),
                entry.number_of_units.to_string(),
            ),
            ("meal".to_owned(), entry.meal.to_string()),
            ("date".to_owned(), date_to_days(entry.date.as_deref())?),
        ]);
        Ok(self
            .call("food_entry.create", params, Scope::User, Method::Post)?
            .into_json())
    }
}
