//! OAuth 1.0a client plumbing for the FatSecret Platform API.
//!
//! This crate provides:
//! - [`oauth`]: percent-encoding, HMAC-SHA1 signatures, request signing and
//!   the three-legged token exchange
//! - [`HttpExecutor`]: sends signed requests and parses JSON or form bodies
//! - [`CredentialStore`]: the persisted consumer key/secret and access token
//!
//! # Signing a request
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use larder_oauth::oauth::{Method, RequestBuilder};
//! use larder_oauth::{CredentialStore, Credentials, HttpExecutor};
//!
//! let store = CredentialStore::new(Path::new("credentials.json"), Credentials::default());
//! let credentials = store.load();
//! let request = RequestBuilder::new(
//!     Method::Get,
//!     "https://platform.fatsecret.com/rest/server.api",
//!     credentials.consumer()?,
//! )
//! .param("method", "foods.search")
//! .param("search_expression", "oatmeal")
//! .param("format", "json")
//! .sign();
//!
//! let body = HttpExecutor::new(None).execute(&request)?;
//! # Ok(())
//! # }
//! ```

mod credentials;
mod http;

pub mod error;
pub mod oauth;

pub use credentials::{CredentialStore, Credentials};
pub use error::{Leg, OAuthError};
pub use http::{HttpExecutor, ResponseBody};
