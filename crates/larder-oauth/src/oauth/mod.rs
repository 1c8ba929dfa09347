//! OAuth 1.0a HMAC-SHA1 signing and token exchange.
//!
//! Signatures follow RFC 5849: parameters from every transport location
//! (header, query string, form body) are covered, so business parameters
//! must be added to the [`RequestBuilder`] before it is signed.

pub(crate) mod encode;
mod handshake;
mod request;
mod signature;

pub use encode::oauth_encode;
pub use handshake::{AccessToken, AuthFlow, AuthState, RequestToken, TokenExchange};
pub use request::{
    Consumer, Method, OAUTH_VERSION, RequestBuilder, SIGNATURE_METHOD, SignedRequest, TokenPair,
};
pub use signature::{build_base_string, build_signing_key, sign};
