//! Bittrex v1.1 request signing.
//!
//! `apikey` and `nonce` join the query string, all params are sorted by
//! name, and the complete URI is signed with HMAC-SHA512 into `apisign`.

use reqwest::header::HeaderMap;

use crate::api::{
    credentials::Credentials,
    error::ApiError,
    signing::{header_value, hmac_sha512_hex},
    transport::build_url,
};

/// URI with params sorted by name
pub fn public_url(base: &str, path: &str, mut params: Vec<(&str, String)>) -> Result<String, ApiError> {
    params.sort_by(|a, b| a.0.cmp(b.0));
    build_url(base, path, &params)
}

/// URI with `apikey` and `nonce` added, params sorted by name
pub fn signed_url(
    base: &str,
    path: &str,
    mut params: Vec<(&str, String)>,
    credentials: &Credentials,
    nonce: u64,
) -> Result<String, ApiError> {
    params.push(("apikey", credentials.api_key().to_string()));
    params.push(("nonce", nonce.to_string()));
    public_url(base, path, params)
}

/// `apisign` header for `uri`; empty without credentials
pub fn auth_headers(credentials: Option<&Credentials>, uri: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    if let Some(credentials) = credentials {
        let signature = hmac_sha512_hex(credentials.api_secret(), uri.as_bytes());
        headers.insert("apisign", header_value("signature", &signature)?);
    }
    Ok(headers)
}
