use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Bad credential material (empty values, bytes that cannot go in a header,
    /// keychain failures)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Client not authenticated")]
    NotAuthenticated,

    #[error("Already authenticated")]
    AlreadyAuthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Remote 4xx/5xx or a failure envelope from the exchange
    #[error("Request failed: {message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid API response: {0}")]
    ParseError(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Invalid pair {0}")]
    InvalidPair(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn request_failed(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError::RequestFailed {
            status,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::ParseError(err.to_string())
    }
}
