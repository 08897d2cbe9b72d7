use std::time::Duration;

use async_trait::async_trait;

use super::credentials::Credentials;
use super::error::ApiError;
use crate::models::{Balances, OrderDetails, OrderId, OrderRequest, Pair, Ticker, Trade};

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Connection settings for one exchange client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST root, without a trailing slash for v1-style APIs
    pub base_url: String,
    pub timeout: Duration,
    pub rate_limit: RateLimitConfig,
}

impl ClientConfig {
    pub fn bitfinex() -> Self {
        Self {
            base_url: "https://api.bitfinex.com/v1".to_string(),
            timeout: Duration::from_secs(30),
            rate_limit: RateLimitConfig {
                requests_per_second: 1,
                burst_size: 10,
            },
        }
    }

    pub fn bitfinex_v2() -> Self {
        Self {
            base_url: "https://api.bitfinex.com/".to_string(),
            timeout: Duration::from_secs(30),
            rate_limit: RateLimitConfig {
                requests_per_second: 1,
                burst_size: 10,
            },
        }
    }

    pub fn bittrex() -> Self {
        Self {
            base_url: "https://bittrex.com/api/v1.1".to_string(),
            timeout: Duration::from_secs(30),
            rate_limit: RateLimitConfig {
                requests_per_second: 1,
                burst_size: 5,
            },
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Core trait that all exchange clients must implement.
///
/// Market data calls work on any client. Balance and order calls require a
/// successful [`Exchange::authenticate`] and fail with
/// [`ApiError::NotAuthenticated`] before touching the network otherwise.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Exchange name (e.g. "Bitfinex", "Bittrex")
    fn name(&self) -> &str;

    /// Install credentials and validate them with a balances probe.
    ///
    /// A rejected probe yields [`ApiError::InvalidCredentials`] and leaves
    /// the client unauthenticated.
    async fn authenticate(&mut self, credentials: Credentials) -> Result<(), ApiError>;

    fn unauthenticate(&mut self);

    fn is_authenticated(&self) -> bool;

    /// Supported pairs, sorted
    async fn pairs(&self) -> Result<Vec<Pair>, ApiError>;

    async fn ticker(&self, pair: &Pair) -> Result<Ticker, ApiError>;

    /// Recent trades, most recent first
    async fn trades(&self, pair: &Pair) -> Result<Vec<Trade>, ApiError>;

    async fn balances(&self) -> Result<Balances, ApiError>;

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderId, ApiError>;

    async fn cancel_order(&self, order_id: &str) -> Result<(), ApiError>;

    async fn order_details(&self, order_id: &str) -> Result<OrderDetails, ApiError>;

    /// IDs of open orders
    async fn active_orders(&self) -> Result<Vec<OrderId>, ApiError>;

    /// IDs of executed and canceled orders the exchange still reports
    async fn past_orders(&self) -> Result<Vec<OrderId>, ApiError>;

    /// Get rate limit configuration for this exchange
    fn rate_limit(&self) -> RateLimitConfig;
}
