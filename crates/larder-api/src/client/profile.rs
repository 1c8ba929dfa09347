//! User profile.

use std::collections::BTreeMap;

use serde_json::Value;

use super::FatSecretClient;
use crate::error::ApiError;

impl FatSecretClient {
    /// Profile of the authorized user (`profile.get`).
    pub fn profile(&self) -> Result<Value, ApiError> {
        self.get_user("profile.get", BTreeMap::new())
    }
}
