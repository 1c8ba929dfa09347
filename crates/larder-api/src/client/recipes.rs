//! Recipe search and detail operations.

use std::collections::BTreeMap;

use serde_json::Value;

use super::foods::search_params;
use super::{FatSecretClient, require};
use crate::error::ApiError;
use crate::types::SearchQuery;

impl FatSecretClient {
    /// Search recipes by free text (`recipes.search`).
    pub fn search_recipes(&self, query: &SearchQuery) -> Result<Value, ApiError> {
        self.get("recipes.search", search_params(query)?)
    }

    /// Recipe detail (`recipe.get`).
    pub fn get_recipe(&self, recipe_id: &str) -> Result<Value, ApiError> {
        require(recipe_id, "recipe_id")?;
        self.get(
            "recipe.get",
            BTreeMap::from([("recipe_id".to_owned(), recipe_id.to_owned())]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{client, consumer_only};
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_get_recipe() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("method".into(), "recipe.get".into()),
                Matcher::UrlEncoded("recipe_id".into(), "91".into()),
            ]))
            .with_body(r#"{"recipe":{"recipe_id":"91"}}"#)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let recipe = client(&server, &dir, &consumer_only())
            .get_recipe("91")
            .unwrap();

        mock.assert();
        assert_eq!(recipe["recipe"]["recipe_id"], "91");
    }
}
