use super::credentials::Credentials;
use super::error::ApiError;

/// Authentication state shared by every exchange client.
///
/// Credentials are installed by `begin`, used to sign the probe request,
/// and only become usable for regular calls once `finish` accepts the probe.
#[derive(Debug, Default)]
pub struct Session {
    credentials: Option<Credentials>,
    authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Credentials for an operation that requires a confirmed session
    pub fn require(&self) -> Result<&Credentials, ApiError> {
        match (&self.credentials, self.authenticated) {
            (Some(credentials), true) => Ok(credentials),
            _ => Err(ApiError::NotAuthenticated),
        }
    }

    /// Credentials available for signing, confirmed or not
    pub fn signing_credentials(&self) -> Result<&Credentials, ApiError> {
        self.credentials.as_ref().ok_or(ApiError::NotAuthenticated)
    }

    pub fn begin(&mut self, credentials: Credentials) -> Result<(), ApiError> {
        if self.authenticated {
            return Err(ApiError::AlreadyAuthenticated);
        }
        self.credentials = Some(credentials);
        Ok(())
    }

    /// Settle a pending `begin` with the outcome of the credential probe
    pub fn finish<T>(&mut self, exchange: &str, probe: Result<T, ApiError>) -> Result<(), ApiError> {
        match probe {
            Ok(_) => {
                self.authenticated = true;
                log::info!("Authenticated with {}", exchange);
                Ok(())
            }
            Err(ApiError::RequestFailed { message, .. }) => {
                log::warn!("{} rejected credentials: {}", exchange, message);
                self.reset();
                Err(ApiError::InvalidCredentials)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    pub fn reset(&mut self) {
        self.credentials = None;
        self.authenticated = false;
    }
}
