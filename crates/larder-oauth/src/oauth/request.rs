//! OAuth parameter assembly and request signing.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use super::encode::{form_decode, oauth_encode};
use super::signature::sign;

/// Signature method advertised in `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Protocol version advertised in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

/// HTTP method of a signed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Parameters travel in the query string.
    Get,
    /// Parameters travel in a form-encoded body.
    Post,
}

impl Method {
    /// Uppercase method name as used in the base string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application (consumer) credentials.
#[derive(Debug, Clone, Copy)]
pub struct Consumer<'a> {
    pub key: &'a str,
    pub secret: &'a str,
}

/// A request token or access token together with its secret.
#[derive(Debug, Clone, Copy)]
pub struct TokenPair<'a> {
    pub token: &'a str,
    pub secret: &'a str,
}

/// Generate cryptographically random nonce (32 hex characters).
fn generate_nonce() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}

/// Generate Unix timestamp in seconds.
fn generate_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}

/// Collects everything that must be covered by a signature.
///
/// Business parameters are added before signing; a [`SignedRequest`] cannot
/// be extended afterwards.
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    method: Method,
    url: String,
    consumer: Consumer<'a>,
    token: Option<TokenPair<'a>>,
    extra_oauth: BTreeMap<String, String>,
    params: BTreeMap<String, String>,
}

impl<'a> RequestBuilder<'a> {
    /// Start a request to `url` signed with the consumer credentials.
    ///
    /// A query string on `url` is moved into the business parameters so the
    /// signature covers it and the base string uses the bare URL
    /// (RFC 5849 Section 3.4.1.2).
    pub fn new(method: Method, url: impl Into<String>, consumer: Consumer<'a>) -> Self {
        let mut url = url.into();
        let mut params = BTreeMap::new();
        if let Some(pos) = url.find('?') {
            params.extend(form_decode(&url[pos + 1..]));
            url.truncate(pos);
        }

        Self {
            method,
            url,
            consumer,
            token: None,
            extra_oauth: BTreeMap::new(),
            params,
        }
    }

    /// Sign with a request or access token; adds `oauth_token`.
    #[must_use]
    pub fn token(mut self, token: TokenPair<'a>) -> Self {
        self.token = Some(token);
        self
    }

    /// Set `oauth_callback` (leg 1).
    #[must_use]
    pub fn callback(mut self, callback: &str) -> Self {
        self.extra_oauth
            .insert("oauth_callback".to_owned(), callback.to_owned());
        self
    }

    /// Set `oauth_verifier` (leg 3).
    #[must_use]
    pub fn verifier(mut self, verifier: &str) -> Self {
        self.extra_oauth
            .insert("oauth_verifier".to_owned(), verifier.to_owned());
        self
    }

    /// Add a business parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add several business parameters.
    #[must_use]
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sign with a fresh nonce and the current timestamp.
    pub fn sign(self) -> SignedRequest {
        self.sign_with(generate_nonce(), generate_timestamp())
    }

    /// Sign with an explicit nonce and timestamp.
    ///
    /// Only for reproducible signatures; reusing a nonce against a live
    /// provider gets the request rejected.
    pub fn sign_with(self, nonce: String, timestamp: String) -> SignedRequest {
        let mut oauth_params = self.extra_oauth;
        oauth_params.insert("oauth_consumer_key".to_owned(), self.consumer.key.to_owned());
        oauth_params.insert("oauth_nonce".to_owned(), nonce);
        oauth_params.insert(
            "oauth_signature_method".to_owned(),
            SIGNATURE_METHOD.to_owned(),
        );
        oauth_params.insert("oauth_timestamp".to_owned(), timestamp);
        oauth_params.insert("oauth_version".to_owned(), OAUTH_VERSION.to_owned());
        if let Some(token) = self.token {
            oauth_params.insert("oauth_token".to_owned(), token.token.to_owned());
        }

        // A business parameter cannot shadow a protocol parameter.
        let mut params = self.params;
        params.retain(|k, _| !oauth_params.contains_key(k));

        let signature_params: Vec<(String, String)> = oauth_params
            .iter()
            .chain(params.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let signature = sign(
            self.method.as_str(),
            &self.url,
            &signature_params,
            self.consumer.secret,
            self.token.map_or("", |t| t.secret),
        );
        oauth_params.insert("oauth_signature".to_owned(), signature);

        SignedRequest {
            method: self.method,
            url: self.url,
            oauth_params,
            params,
        }
    }
}

/// A request whose signature covers exactly its current parameters.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    method: Method,
    url: String,
    oauth_params: BTreeMap<String, String>,
    params: BTreeMap<String, String>,
}

impl SignedRequest {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The `oauth_signature` value.
    pub fn signature(&self) -> &str {
        self.oauth_params
            .get("oauth_signature")
            .map_or("", String::as_str)
    }

    /// OAuth protocol parameters, including `oauth_signature`.
    pub fn oauth_params(&self) -> &BTreeMap<String, String> {
        &self.oauth_params
    }

    /// Business parameters.
    pub fn business_params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// All parameters (OAuth and business) for query-string or body transport.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.oauth_params
            .iter()
            .chain(self.params.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Authorization` header value carrying only the OAuth parameters.
    pub fn authorization_header(&self) -> String {
        let parts: Vec<String> = self
            .oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", oauth_encode(k), oauth_encode(v)))
            .collect();
        format!("OAuth {}", parts.join(", "))
    }
}
