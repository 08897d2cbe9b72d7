pub mod bitfinex;
pub mod bitfinex_v2;
pub mod bittrex;
pub mod client;
pub mod credentials;
pub mod error;
pub mod nonce;
pub mod normalize;
pub mod rate_limiter;
pub mod session;
pub mod signing;
pub mod transport;

pub use bitfinex::BitfinexClient;
pub use bitfinex_v2::BitfinexV2Client;
pub use bittrex::BittrexClient;
pub use client::{ClientConfig, Exchange, RateLimitConfig};
pub use credentials::{delete_credentials, load_credentials, store_credentials, Credentials};
pub use error::ApiError;
pub use rate_limiter::RateLimiter;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
