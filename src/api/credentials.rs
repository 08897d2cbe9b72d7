use std::fmt;

use keyring::Entry;

use super::error::ApiError;

const SERVICE_NAME: &str = "exchange-clients";

/// API key and secret for one exchange account.
///
/// Immutable once built. `Debug` never prints the secret and only previews
/// the last characters of the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();
        if api_key.is_empty() {
            return Err(ApiError::AuthenticationError("Must provide API key".to_string()));
        }
        if api_secret.is_empty() {
            return Err(ApiError::AuthenticationError("Must provide API secret".to_string()));
        }
        Ok(Self { api_key, api_secret })
    }

    /// Read credentials from two environment variables
    pub fn from_env(api_key_var: &str, api_secret_var: &str) -> Result<Self, ApiError> {
        Self::from_lookup(api_key_var, api_secret_var, |name| std::env::var(name).ok())
    }

    /// Same as [`Credentials::from_env`] with a caller-supplied variable lookup
    pub fn from_lookup<F>(api_key_var: &str, api_secret_var: &str, lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(api_key_var).ok_or_else(|| {
            ApiError::AuthenticationError(format!("{} is not set", api_key_var))
        })?;
        let api_secret = lookup(api_secret_var).ok_or_else(|| {
            ApiError::AuthenticationError(format!("{} is not set", api_secret_var))
        })?;
        Self::new(api_key, api_secret)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &[u8] {
        self.api_secret.as_bytes()
    }

    /// Key preview (last 4 characters)
    pub fn key_preview(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            "*".repeat(chars.len())
        } else {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", "*".repeat(4), tail)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.key_preview())
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

fn entry(exchange: &str, item: &str) -> Result<Entry, ApiError> {
    Entry::new(SERVICE_NAME, &format!("{}-{}", exchange, item))
        .map_err(|e| ApiError::AuthenticationError(format!("Failed to create keyring entry: {}", e)))
}

/// Store credentials for an exchange in the system keychain
///
/// Uses platform-specific secure storage:
/// - macOS: Keychain
/// - Windows: Credential Manager
/// - Linux: Secret Service
pub fn store_credentials(exchange: &str, credentials: &Credentials) -> Result<(), ApiError> {
    entry(exchange, "api-key")?
        .set_password(&credentials.api_key)
        .map_err(|e| ApiError::AuthenticationError(format!("Failed to store API key: {}", e)))?;

    entry(exchange, "api-secret")?
        .set_password(&credentials.api_secret)
        .map_err(|e| ApiError::AuthenticationError(format!("Failed to store API secret: {}", e)))?;

    Ok(())
}

/// Load credentials for an exchange from the system keychain
pub fn load_credentials(exchange: &str) -> Result<Credentials, ApiError> {
    let api_key = entry(exchange, "api-key")?
        .get_password()
        .map_err(|e| ApiError::AuthenticationError(format!("Failed to retrieve API key: {}", e)))?;

    let api_secret = entry(exchange, "api-secret")?
        .get_password()
        .map_err(|e| ApiError::AuthenticationError(format!("Failed to retrieve API secret: {}", e)))?;

    Credentials::new(api_key, api_secret)
}

/// Delete stored credentials for an exchange
pub fn delete_credentials(exchange: &str) -> Result<(), ApiError> {
    let _ = entry(exchange, "api-key")?.delete_credential(); // Ignore error if doesn't exist
    let _ = entry(exchange, "api-secret")?.delete_credential();
    Ok(())
}
