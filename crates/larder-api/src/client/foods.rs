//! Food search and detail operations.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{FatSecretClient, require};
use crate::error::ApiError;
use crate::types::SearchQuery;

impl FatSecretClient {
    /// Search foods by free text (`foods.search`).
    pub fn search_foods(&self, query: &SearchQuery) -> Result<Value, ApiError> {
        self.get("foods.search", search_params(query)?)
    }

    /// Food detail including servings (`food.get`).
    pub fn get_food(&self, food_id: &str) -> Result<Value, ApiError> {
        require(food_id, "food_id")?;
        self.get(
            "food.get",
            BTreeMap::from([("food_id".to_owned(), food_id.to_owned())]),
        )
    }
}

/// Parameters shared by `foods.search` and `recipes.search`.
pub(super) fn search_params(query: &SearchQuery) -> Result<BTreeMap<String, String>, ApiError> {
    require(&query.expression, "search_expression")?;

    let mut params = BTreeMap::from([(
        "search_expression".to_owned(),
        query.expression.clone(),
    )]);
    if let Some(page) = query.page_number {
        params.insert("page_number".to_owned(), page.to_string());
    }
    if let Some(max) = query.max_results {
        if !(1..=50).contains(&max) {
            return Err(ApiError::Validation(format!(
                "max_results must be between 1 and 50, got {max}"
            )));
        }
        params.insert("max_results".to_owned(), max.to_string());
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{client, consumer_only};
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_search_params() {
        let query = SearchQuery {
            expression: "banana".to_owned(),
            page_number: Some(2),
            max_results: Some(10),
        };
        let params = search_params(&query).unwrap();
        assert_eq!(params.get("search_expression").map(String::as_str), Some("banana"));
        assert_eq!(params.get("page_number").map(String::as_str), Some("2"));
        assert_eq!(params.get("max_results").map(String::as_str), Some("10"));
    }

    #[test]
    fn test_search_params_rejects_empty_expression() {
        let err = search_params(&SearchQuery::new("  ")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_search_params_rejects_max_results_out_of_range() {
        let query = SearchQuery {
            max_results: Some(51),
            ..SearchQuery::new("banana")
        };
        assert!(matches!(
            search_params(&query),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_search_foods() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("method".into(), "foods.search".into()),
                Matcher::UrlEncoded("search_expression".into(), "peanut butter".into()),
            ]))
            .with_body(r#"{"foods":{"max_results":"20","total_results":"1"}}"#)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let result = client(&server, &dir, &consumer_only())
            .search_foods(&SearchQuery::new("peanut butter"))
            .unwrap();

        mock.assert();
        assert_eq!(result["foods"]["total_results"], "1");
    }

    #[test]
    fn test_get_food_requires_id() {
        let server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let err = client(&server, &dir, &consumer_only())
            .get_food("")
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
