//! Three-legged OAuth 1.0a token exchange.
//!
//! 1. Request temporary credentials (request token), `oauth_callback=oob`
//! 2. User opens the authorization URL and copies a verifier code
//! 3. Exchange request token + verifier for an access token, then persist it
//!
//! [`TokenExchange`] performs single legs and keeps no state, so a server can
//! run leg 1 and leg 3 as unrelated calls with the request token passed back
//! by the caller. [`AuthFlow`] walks the legs in one process and holds the
//! request token in memory.

use larder_config::ProviderConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::request::{Method, RequestBuilder, TokenPair};
use crate::credentials::{CredentialStore, Credentials};
use crate::error::{Leg, OAuthError};
use crate::http::{HttpExecutor, ResponseBody};

/// Temporary credentials from leg 1. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_confirmed: Option<bool>,
}

/// Final access credentials from leg 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Where a local installation stands in the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    NoCredentials,
    CredentialsSet,
    RequestTokenObtained(RequestToken),
    AccessTokenObtained,
}

impl AuthState {
    /// State implied by persisted credentials alone.
    pub fn from_credentials(credentials: &Credentials) -> Self {
        if credentials.consumer().is_err() {
            Self::NoCredentials
        } else if credentials.access().is_some() {
            Self::AccessTokenObtained
        } else {
            Self::CredentialsSet
        }
    }
}

/// Stateless single-leg operations against the provider's OAuth endpoints.
pub struct TokenExchange<'a> {
    executor: &'a HttpExecutor,
    request_token_url: String,
    authorize_url: String,
    access_token_url: String,
}

impl<'a> TokenExchange<'a> {
    pub fn new(executor: &'a HttpExecutor, provider: &ProviderConfig) -> Self {
        Self {
            executor,
            request_token_url: provider.request_token_url.clone(),
            authorize_url: provider.authorize_url.clone(),
            access_token_url: provider.access_token_url.clone(),
        }
    }

    /// Leg 1: obtain temporary credentials.
    pub fn request_token(&self, credentials: &Credentials) -> Result<RequestToken, OAuthError> {
        let request =
            RequestBuilder::new(Method::Post, &self.request_token_url, credentials.consumer()?)
                .callback("oob")
                .sign();

        info!("Requesting temporary credentials");
        let body = self.executor.execute(&request)?;

        Ok(RequestToken {
            oauth_token: required_field(&body, "oauth_token", Leg::RequestToken)?,
            oauth_token_secret: required_field(&body, "oauth_token_secret", Leg::RequestToken)?,
            callback_confirmed: body
                .field("oauth_callback_confirmed")
                .map(|v| v == "true"),
        })
    }

    /// Leg 2: URL the user opens to authorize the request token.
    pub fn authorization_url(&self, request_token: &RequestToken) -> String {
        format!(
            "{}?oauth_token={}",
            self.authorize_url, request_token.oauth_token
        )
    }

    /// Leg 3: exchange the verifier for an access token. Does not persist.
    pub fn exchange_verifier(
        &self,
        credentials: &Credentials,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken, OAuthError> {
        let verifier = verifier.trim();
        if verifier.is_empty() {
            return Err(OAuthError::handshake(
                Leg::AccessToken,
                "verifier code is empty",
            ));
        }

        let request =
            RequestBuilder::new(Method::Get, &self.access_token_url, credentials.consumer()?)
                .token(TokenPair {
                    token: &request_token.oauth_token,
                    secret: &request_token.oauth_token_secret,
                })
                .verifier(verifier)
                .sign();

        info!("Exchanging verifier for access token");
        let body = self.executor.execute(&request)?;

        Ok(AccessToken {
            oauth_token: required_field(&body, "oauth_token", Leg::AccessToken)?,
            oauth_token_secret: required_field(&body, "oauth_token_secret", Leg::AccessToken)?,
            user_id: body.field("user_id").filter(|v| !v.is_empty()),
        })
    }

    /// Leg 3 followed by persisting the access token.
    ///
    /// Credentials are re-read from `store` first. Nothing is written unless
    /// the provider returned a complete token.
    pub fn complete(
        &self,
        store: &CredentialStore,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<Credentials, OAuthError> {
        let mut credentials = store.load();
        let access_token = self.exchange_verifier(&credentials, request_token, verifier)?;
        credentials.apply_access_token(&access_token);
        store.save(&credentials)?;
        info!(user_id = ?credentials.user_id, "Access token stored");
        Ok(credentials)
    }
}

/// In-process walk through all legs, used by the interactive console.
pub struct AuthFlow<'a> {
    exchange: TokenExchange<'a>,
    store: &'a CredentialStore,
    state: AuthState,
}

impl<'a> AuthFlow<'a> {
    pub fn new(exchange: TokenExchange<'a>, store: &'a CredentialStore) -> Self {
        let state = AuthState::from_credentials(&store.load());
        Self {
            exchange,
            store,
            state,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Run leg 1 and return the authorization URL.
    ///
    /// Allowed from any state with consumer credentials, which lets an
    /// authorized user re-authorize after revocation.
    pub fn begin(&mut self) -> Result<String, OAuthError> {
        let credentials = self.store.load();
        let request_token = self.exchange.request_token(&credentials)?;
        let url = self.exchange.authorization_url(&request_token);
        self.state = AuthState::RequestTokenObtained(request_token);
        Ok(url)
    }

    /// Run leg 3 with the verifier the user copied.
    ///
    /// On failure the request token is dropped; call [`AuthFlow::begin`] again.
    /// Afterwards the state reflects what the store holds.
    pub fn finish(&mut self, verifier: &str) -> Result<Credentials, OAuthError> {
        let AuthState::RequestTokenObtained(request_token) = &self.state else {
            return Err(OAuthError::handshake(
                Leg::AccessToken,
                "no request token; start the authorization again",
            ));
        };

        let result = self.exchange.complete(self.store, request_token, verifier);
        self.state = AuthState::from_credentials(&self.store.load());
        result
    }
}

fn required_field(body: &ResponseBody, key: &str, leg: Leg) -> Result<String, OAuthError> {
    body.field(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| OAuthError::handshake(leg, format!("response missing {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, ServerGuard};
    use pretty_assertions::assert_eq;

    fn provider(server: &ServerGuard) -> ProviderConfig {
        ProviderConfig {
            request_token_url: format!("{}/oauth/request_token", server.url()),
            authorize_url: "https://auth.example.test/oauth/authorize".to_owned(),
            access_token_url: format!("{}/oauth/access_token", server.url()),
            api_url: format!("{}/rest/server.api", server.url()),
        }
    }

    fn consumer_only() -> Credentials {
        Credentials {
            client_id: "ck".to_owned(),
            client_secret: "cs".to_owned(),
            ..Credentials::default()
        }
    }

    fn request_token() -> RequestToken {
        RequestToken {
            oauth_token: "T1".to_owned(),
            oauth_token_secret: "S1".to_owned(),
            callback_confirmed: Some(true),
        }
    }

    fn store_with(dir: &tempfile::TempDir, credentials: &Credentials) -> CredentialStore {
        let store = CredentialStore::new(dir.path().join("creds.json"), Credentials::default());
        store.save(credentials).unwrap();
        store
    }

    #[test]
    fn test_auth_state_from_credentials() {
        assert_eq!(
            AuthState::from_credentials(&Credentials::default()),
            AuthState::NoCredentials
        );
        assert_eq!(
            AuthState::from_credentials(&consumer_only()),
            AuthState::CredentialsSet
        );
        let mut authorized = consumer_only();
        authorized.access_token = Some("at".to_owned());
        authorized.access_token_secret = Some("as".to_owned());
        assert_eq!(
            AuthState::from_credentials(&authorized),
            AuthState::AccessTokenObtained
        );
    }

    #[test]
    fn test_request_token_and_authorization_url() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/oauth/request_token")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("oauth_callback=oob".into()),
                Matcher::Regex("oauth_consumer_key=ck".into()),
            ]))
            .with_status(200)
            .with_body("oauth_token=T1&oauth_token_secret=S1&oauth_callback_confirmed=true")
            .create();

        let executor = HttpExecutor::new(None);
        let exchange = TokenExchange::new(&executor, &provider(&server));
        let token = exchange.request_token(&consumer_only()).unwrap();

        mock.assert();
        assert_eq!(token, request_token());
        assert_eq!(
            exchange.authorization_url(&token),
            "https://auth.example.test/oauth/authorize?oauth_token=T1"
        );
    }

    #[test]
    fn test_request_token_does_not_send_oauth_token() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/oauth/request_token")
            .match_body(Matcher::Regex("oauth_token=".into()))
            .expect(0)
            .create();
        let _fallback = server
            .mock("POST", "/oauth/request_token")
            .with_body("oauth_token=T1&oauth_token_secret=S1")
            .create();

        let executor = HttpExecutor::new(None);
        TokenExchange::new(&executor, &provider(&server))
            .request_token(&consumer_only())
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_request_token_missing_secret_is_handshake_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/oauth/request_token")
            .with_body("oauth_token=T1")
            .create();

        let executor = HttpExecutor::new(None);
        let err = TokenExchange::new(&executor, &provider(&server))
            .request_token(&consumer_only())
            .unwrap_err();

        assert!(matches!(
            err,
            OAuthError::Handshake {
                leg: Leg::RequestToken,
                ..
            }
        ));
        assert!(err.to_string().contains("oauth_token_secret"));
    }

    #[test]
    fn test_request_token_requires_consumer_credentials() {
        let server = mockito::Server::new();
        let executor = HttpExecutor::new(None);
        let err = TokenExchange::new(&executor, &provider(&server))
            .request_token(&Credentials::default())
            .unwrap_err();
        assert!(matches!(err, OAuthError::MissingCredentials(_)));
    }

    #[test]
    fn test_request_token_http_error_keeps_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/oauth/request_token")
            .with_status(401)
            .with_body("Invalid consumer key")
            .create();

        let executor = HttpExecutor::new(None);
        let err = TokenExchange::new(&executor, &provider(&server))
            .request_token(&consumer_only())
            .unwrap_err();
        assert!(matches!(
            err,
            OAuthError::HttpResponse { status: 401, ref body } if body == "Invalid consumer key"
        ));
    }

    #[test]
    fn test_complete_persists_access_token() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/oauth/access_token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("oauth_token".into(), "T1".into()),
                Matcher::UrlEncoded("oauth_verifier".into(), "998877".into()),
            ]))
            .with_body("oauth_token=AT&oauth_token_secret=AS&user_id=u-1")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, &consumer_only());
        let executor = HttpExecutor::new(None);
        let credentials = TokenExchange::new(&executor, &provider(&server))
            .complete(&store, &request_token(), " 998877\n")
            .unwrap();

        mock.assert();
        assert_eq!(credentials.access_token.as_deref(), Some("AT"));
        assert_eq!(store.load(), credentials);
        assert_eq!(store.load().user_id.as_deref(), Some("u-1"));
        assert_eq!(store.load().client_id, "ck");
    }

    #[test]
    fn test_complete_missing_secret_writes_nothing() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/oauth/access_token")
            .match_query(Matcher::Any)
            .with_body("oauth_token=AT&user_id=u-1")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let before = consumer_only();
        let store = store_with(&dir, &before);
        let executor = HttpExecutor::new(None);
        let err = TokenExchange::new(&executor, &provider(&server))
            .complete(&store, &request_token(), "998877")
            .unwrap_err();

        assert!(matches!(
            err,
            OAuthError::Handshake {
                leg: Leg::AccessToken,
                ..
            }
        ));
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_exchange_accepts_json_response() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/oauth/access_token")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(r#"{"oauth_token":"AT","oauth_token_secret":"AS"}"#)
            .create();

        let executor = HttpExecutor::new(None);
        let token = TokenExchange::new(&executor, &provider(&server))
            .exchange_verifier(&consumer_only(), &request_token(), "1")
            .unwrap();
        assert_eq!(token.oauth_token, "AT");
        assert_eq!(token.user_id, None);
    }

    #[test]
    fn test_exchange_rejects_empty_verifier() {
        let server = mockito::Server::new();
        let executor = HttpExecutor::new(None);
        let err = TokenExchange::new(&executor, &provider(&server))
            .exchange_verifier(&consumer_only(), &request_token(), "  ")
            .unwrap_err();
        assert!(matches!(err, OAuthError::Handshake { .. }));
    }

    #[test]
    fn test_auth_flow_walks_all_states() {
        let mut server = mockito::Server::new();
        let _leg1 = server
            .mock("POST", "/oauth/request_token")
            .with_body("oauth_token=T1&oauth_token_secret=S1")
            .create();
        let _leg3 = server
            .mock("GET", "/oauth/access_token")
            .match_query(Matcher::UrlEncoded("oauth_token".into(), "T1".into()))
            .with_body("oauth_token=AT&oauth_token_secret=AS&user_id=u-1")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, &consumer_only());
        let executor = HttpExecutor::new(None);
        let mut flow = AuthFlow::new(TokenExchange::new(&executor, &provider(&server)), &store);
        assert_eq!(flow.state(), &AuthState::CredentialsSet);

        let url = flow.begin().unwrap();
        assert_eq!(url, "https://auth.example.test/oauth/authorize?oauth_token=T1");
        assert!(matches!(flow.state(), AuthState::RequestTokenObtained(t) if t.oauth_token == "T1"));

        flow.finish("1234").unwrap();
        assert_eq!(flow.state(), &AuthState::AccessTokenObtained);
        assert_eq!(store.load().access_token_secret.as_deref(), Some("AS"));
    }

    #[test]
    fn test_auth_flow_failed_finish_keeps_stored_authorization() {
        let mut server = mockito::Server::new();
        let _leg1 = server
            .mock("POST", "/oauth/request_token")
            .with_body("oauth_token=T2&oauth_token_secret=S2")
            .create();
        let _leg3 = server
            .mock("GET", "/oauth/access_token")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("invalid verifier")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let mut authorized = consumer_only();
        authorized.access_token = Some("at".to_owned());
        authorized.access_token_secret = Some("as".to_owned());
        let store = store_with(&dir, &authorized);
        let executor = HttpExecutor::new(None);
        let mut flow = AuthFlow::new(TokenExchange::new(&executor, &provider(&server)), &store);

        flow.begin().unwrap();
        let err = flow.finish("bad").unwrap_err();

        assert!(matches!(err, OAuthError::HttpResponse { status: 401, .. }));
        assert_eq!(flow.state(), &AuthState::AccessTokenObtained);
        assert_eq!(store.load(), authorized);
        assert!(flow.finish("bad").is_err());
    }

    #[test]
    fn test_auth_flow_finish_without_begin() {
        let server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, &consumer_only());
        let executor = HttpExecutor::new(None);
        let mut flow = AuthFlow::new(TokenExchange::new(&executor, &provider(&server)), &store);

        let err = flow.finish("1234").unwrap_err();
        assert!(matches!(err, OAuthError::Handshake { .. }));
    }
}
