//! Sends signed requests and parses provider responses.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};
use ureq::Agent;

use crate::error::OAuthError;
use crate::oauth::encode::{form_decode, form_encode};
use crate::oauth::{Method, SignedRequest};

/// Parsed response body.
///
/// The provider answers some endpoints with JSON and others (notably the
/// token endpoints) with form-encoded text, regardless of content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed as JSON.
    Json(Value),
    /// Body parsed as `key=value&...`.
    Form(BTreeMap<String, String>),
    /// Neither JSON nor form pairs.
    Text(String),
}

impl ResponseBody {
    /// Parse a body: JSON first, then form-encoded, else raw text.
    pub fn parse(text: &str) -> Self {
        if let Ok(json) = serde_json::from_str::<Value>(text) {
            return Self::Json(json);
        }
        let form = form_decode(text);
        if form.is_empty() {
            Self::Text(text.to_owned())
        } else {
            Self::Form(form)
        }
    }

    /// Look up a top-level field as a string.
    ///
    /// JSON numbers and booleans are stringified; other JSON types yield `None`.
    pub fn field(&self, key: &str) -> Option<String> {
        match self {
            Self::Json(Value::Object(map)) => match map.get(key)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            },
            Self::Form(map) => map.get(key).cloned(),
            Self::Json(_) | Self::Text(_) => None,
        }
    }

    /// Convert into a JSON value (form bodies become a string map).
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Form(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ),
            Self::Text(text) => Value::String(text),
        }
    }
}

/// Blocking HTTP executor for signed requests.
///
/// Clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpExecutor {
    agent: Agent,
}

impl HttpExecutor {
    /// Create an executor. `None` leaves requests without a global timeout.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    /// Send a signed request.
    ///
    /// GET puts every parameter in the query string; POST sends them as a
    /// form-encoded body. Non-2xx responses become
    /// [`OAuthError::HttpResponse`] with the body verbatim.
    pub fn execute(&self, request: &SignedRequest) -> Result<ResponseBody, OAuthError> {
        let encoded = form_encode(request.parameters());
        info!(method = %request.method(), url = request.url(), "Sending signed request");

        let response = match request.method() {
            Method::Get => {
                let url = format!("{}?{encoded}", request.url());
                self.agent.get(&url).call()?
            }
            Method::Post => self
                .agent
                .post(request.url())
                .header("Content-Type", "application/x-www-form-urlencoded")
                .send(encoded.as_bytes())?,
        };

        let status = response.status().as_u16();
        let body = response.into_body().read_to_string()?;
        debug!(status, bytes = body.len(), "Received response");

        if !(200..300).contains(&status) {
            return Err(OAuthError::HttpResponse { status, body });
        }

        Ok(ResponseBody::parse(&body))
    }
}
