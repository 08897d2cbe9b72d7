//! Bitfinex v2 request signing.
//!
//! The signature is HMAC-SHA384 over `/api/<path><nonce><body>`, where
//! `body` is the exact JSON string sent with the request.

use reqwest::header::HeaderMap;

use crate::api::{
    credentials::Credentials,
    error::ApiError,
    signing::{header_value, hmac_sha384_hex},
};

/// Paths under this prefix need a signature
pub const AUTH_PREFIX: &str = "v2/auth/";

pub fn requires_auth(path: &str) -> bool {
    path.starts_with(AUTH_PREFIX)
}

pub fn signature_payload(path: &str, nonce: u64, body: &str) -> String {
    format!("/api/{}{}{}", path, nonce, body)
}

/// Authentication headers for a request; empty without credentials
pub fn auth_headers(
    credentials: Option<&Credentials>,
    path: &str,
    nonce: u64,
    body: &str,
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    let Some(credentials) = credentials else {
        return Ok(headers);
    };

    let payload = signature_payload(path, nonce, body);
    let signature = hmac_sha384_hex(credentials.api_secret(), payload.as_bytes());

    headers.insert("bfx-apikey", header_value("API key", credentials.api_key())?);
    headers.insert("bfx-nonce", header_value("nonce", &nonce.to_string())?);
    headers.insert("bfx-signature", header_value("signature", &signature)?);
    headers.insert("content-type", header_value("content type", "application/json")?);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_auth_paths_are_signed() {
        assert!(requires_auth("v2/auth/r/wallets"));
        assert!(requires_auth("v2/auth/w/order/submit"));
        assert!(!requires_auth("v2/ticker/tBTCUSD"));
        assert!(!requires_auth("v2/platform/status"));
    }

    #[test]
    fn test_signature_payload() {
        assert_eq!(
            signature_payload("v2/auth/r/wallets", 1500000000000000, "{}"),
            "/api/v2/auth/r/wallets1500000000000000{}"
        );
    }

    #[test]
    fn test_auth_headers() {
        let creds = Credentials::new("key", "secret").unwrap();
        let headers = auth_headers(Some(&creds), "v2/auth/r/wallets", 7, "{}").unwrap();

        assert_eq!(headers["bfx-apikey"].to_str().unwrap(), "key");
        assert_eq!(headers["bfx-nonce"].to_str().unwrap(), "7");
        assert_eq!(headers["content-type"].to_str().unwrap(), "application/json");
        assert_eq!(
            headers["bfx-signature"].to_str().unwrap(),
            hmac_sha384_hex(b"secret", b"/api/v2/auth/r/wallets7{}")
        );
        assert_eq!(headers["bfx-signature"].len(), 96);
    }

    #[test]
    fn test_no_credentials_no_headers() {
        assert!(auth_headers(None, "v2/auth/r/wallets", 1, "{}").unwrap().is_empty());
    }
}
