//! FatSecret Platform REST client.
//!
//! Every operation is a flat parameter map sent to the single `server.api`
//! endpoint with `method` and `format=json`. Credentials are re-read from the
//! store on each call so tokens written by another process are picked up.

mod diary;
mod foods;
mod profile;
mod recipes;

use std::collections::BTreeMap;

use larder_config::Config;
use larder_oauth::oauth::{Method, RequestBuilder};
use larder_oauth::{CredentialStore, HttpExecutor, ResponseBody};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;

/// Whether a call acts on behalf of the authorized user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Signed with the consumer credentials only.
    Public,
    /// Also signed with the user's access token.
    User,
}

/// Nutrition API client.
pub struct FatSecretClient {
    executor: HttpExecutor,
    api_url: String,
    store: CredentialStore,
}

impl FatSecretClient {
    pub fn new(executor: HttpExecutor, api_url: impl Into<String>, store: CredentialStore) -> Self {
        Self {
            executor,
            api_url: api_url.into(),
            store,
        }
    }

    /// Create client from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            HttpExecutor::new(config.http.timeout()),
            &config.provider.api_url,
            CredentialStore::from_config(&config.credentials_resolved),
        )
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Call an API method with caller-built parameters.
    ///
    /// `method` and `format` are set here and override same-named entries.
    pub fn call(
        &self,
        method: &str,
        params: BTreeMap<String, String>,
        scope: Scope,
        http_method: Method,
    ) -> Result<ResponseBody, ApiError> {
        let credentials = self.store.load();
        let mut builder = RequestBuilder::new(http_method, &self.api_url, credentials.consumer()?)
            .params(params)
            .param("method", method)
            .param("format", "json");
        if scope == Scope::User {
            builder = builder.token(credentials.require_access()?);
        }

        info!(method, ?scope, "Calling API");
        let body = self.executor.execute(&builder.sign())?;
        check_provider_error(&body)?;
        Ok(body)
    }

    /// GET a public method.
    fn get(&self, method: &str, params: BTreeMap<String, String>) -> Result<Value, ApiError> {
        Ok(self
            .call(method, params, Scope::Public, Method::Get)?
            .into_json())
    }

    /// GET a user-scoped method.
    fn get_user(&self, method: &str, params: BTreeMap<String, String>) -> Result<Value, ApiError> {
        Ok(self
            .call(method, params, Scope::User, Method::Get)?
            .into_json())
    }
}

/// Surface `{"error": {"code": .., "message": ..}}` as [`ApiError::Provider`].
///
/// An `error` of any other shape keeps its raw JSON as the message, with
/// code 0 when no numeric code is present.
fn check_provider_error(body: &ResponseBody) -> Result<(), ApiError> {
    let ResponseBody::Json(Value::Object(map)) = body else {
        return Ok(());
    };
    let Some(error) = map.get("error") else {
        return Ok(());
    };

    let code = match error.get("code") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(Value::String(s)) => s.parse().unwrap_or_default(),
        _ => 0,
    };
    let message = match (error, error.get("message").and_then(Value::as_str)) {
        (_, Some(message)) => message.to_owned(),
        (Value::String(text), None) => text.clone(),
        (other, None) => other.to_string(),
    };
    Err(ApiError::Provider { code, message })
}

/// Reject empty required arguments before any network call.
fn require(value: &str, name: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{name} is required")));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::{authorized, client, consumer_only};
    use super::*;
    use larder_oauth::OAuthError;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_call_adds_method_and_format() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("method".into(), "food.get".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("food_id".into(), "33691".into()),
            ]))
            .with_body(r#"{"food":{"food_id":"33691"}}"#)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let api = client(&server, &dir, &consumer_only());
        let params = BTreeMap::from([("food_id".to_owned(), "33691".to_owned())]);
        let body = api
            .call("food.get", params, Scope::Public, Method::Get)
            .unwrap();

        mock.assert();
        assert_eq!(body.into_json(), json!({"food": {"food_id": "33691"}}));
    }

    #[test]
    fn test_public_call_does_not_send_token() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::Regex("oauth_token=".into()))
            .expect(0)
            .create();
        let _fallback = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::Any)
            .with_body("{}")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let api = client(&server, &dir, &authorized());
        api.call("foods.search", BTreeMap::new(), Scope::Public, Method::Get)
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_user_call_sends_access_token() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::UrlEncoded("oauth_token".into(), "at".into()))
            .with_body("{}")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let api = client(&server, &dir, &authorized());
        api.call("profile.get", BTreeMap::new(), Scope::User, Method::Get)
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_user_call_without_token_fails_before_network() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::Any)
            .expect(0)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let api = client(&server, &dir, &consumer_only());
        let err = api
            .call("profile.get", BTreeMap::new(), Scope::User, Method::Get)
            .unwrap_err();

        mock.assert();
        assert!(matches!(
            err,
            ApiError::OAuth(OAuthError::MissingCredentials("access token"))
        ));
    }

    #[test]
    fn test_missing_consumer_credentials() {
        let server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let api = client(&server, &dir, &larder_oauth::Credentials::default());
        let err = api
            .call("foods.search", BTreeMap::new(), Scope::Public, Method::Get)
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::OAuth(OAuthError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_credentials_reloaded_per_call() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::UrlEncoded("oauth_token".into(), "rotated".into()))
            .with_body("{}")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let api = client(&server, &dir, &authorized());
        api.store()
            .update(|c| c.access_token = Some("rotated".to_owned()))
            .unwrap();

        api.call("profile.get", BTreeMap::new(), Scope::User, Method::Get)
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_provider_error_object() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::Any)
            .with_body(r#"{"error":{"code":8,"message":"Invalid signature"}}"#)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let api = client(&server, &dir, &consumer_only());
        let err = api
            .call("foods.search", BTreeMap::new(), Scope::Public, Method::Get)
            .unwrap_err();

        match err {
            ApiError::Provider { code, message } => {
                assert_eq!(code, 8);
                assert_eq!(message, "Invalid signature");
            }
            other => panic!("expected Provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_provider_error_keeps_raw_json() {
        let body = ResponseBody::parse(r#"{"error":{"code":"x9","detail":"quota exceeded"}}"#);
        match check_provider_error(&body).unwrap_err() {
            ApiError::Provider { code, message } => {
                assert_eq!(code, 0);
                assert!(message.contains("quota exceeded"));
                assert!(message.contains("x9"));
            }
            other => panic!("expected Provider error, got {other:?}"),
        }

        let body = ResponseBody::parse(r#"{"error":"Invalid method"}"#);
        match check_provider_error(&body).unwrap_err() {
            ApiError::Provider { message, .. } => assert_eq!(message, "Invalid method"),
            other => panic!("expected Provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_http_error_surfaces_status_and_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/rest/server.api")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("upstream exploded")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let api = client(&server, &dir, &consumer_only());
        let err = api
            .call("foods.search", BTreeMap::new(), Scope::Public, Method::Get)
            .unwrap_err();
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("upstream exploded"));
    }
}
