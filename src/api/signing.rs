use hmac::{Hmac, Mac};
use reqwest::header::HeaderValue;
use sha2::{Sha384, Sha512};

use super::error::ApiError;

type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Lower-case hex HMAC-SHA384 of `message` keyed by `secret`
pub fn hmac_sha384_hex(secret: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha384::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Lower-case hex HMAC-SHA512 of `message` keyed by `secret`
pub fn hmac_sha512_hex(secret: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Header value from credential or signature material
pub fn header_value(what: &str, value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::AuthenticationError(format!("Invalid {}: {}", what, e)))
}
