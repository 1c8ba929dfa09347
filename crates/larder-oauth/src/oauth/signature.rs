//! OAuth 1.0a HMAC-SHA1 signature generation (RFC 5849 Section 3.4).

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::encode::oauth_encode;

type HmacSha1 = Hmac<Sha1>;

/// Build OAuth signature base string per RFC 5849 Section 3.4.1.
///
/// Format: `HTTP_METHOD&encoded_url&encoded_parameters`. Pairs are encoded
/// first, then sorted by encoded key with the encoded value as tie-break, so
/// the result does not depend on the order of `params`.
pub fn build_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (oauth_encode(k), oauth_encode(v)))
        .collect();
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        oauth_encode(url),
        oauth_encode(&param_string)
    )
}

/// Build the HMAC key: `encode(consumer_secret)&encode(token_secret)`.
///
/// `token_secret` is empty during leg 1.
pub fn build_signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        oauth_encode(consumer_secret),
        oauth_encode(token_secret)
    )
}

/// Compute the base64 HMAC-SHA1 signature of a request.
pub fn sign(
    method: &str,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let base_string = build_base_string(method, url, params);
    let signing_key = build_signing_key(consumer_secret, token_secret);
    tracing::debug!(%base_string, "Signing OAuth base string");
    hmac_sha1_base64(&signing_key, &base_string)
}

fn hmac_sha1_base64(key: &str, data: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}
