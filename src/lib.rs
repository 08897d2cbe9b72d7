//! Signed REST clients for Bitfinex (v1 and v2) and Bittrex, normalized
//! behind the [`Exchange`] trait.
//!
//! ```no_run
//! use exchange_clients::{BitfinexClient, Credentials, Exchange, Pair};
//!
//! # async fn run() -> Result<(), exchange_clients::ApiError> {
//! let mut client = BitfinexClient::new()?;
//! let ticker = client.ticker(&Pair::new("BTC", "USD")).await?;
//! println!("last {}", ticker.last);
//!
//! client
//!     .authenticate(Credentials::from_env("BITFINEX_API_KEY", "BITFINEX_API_SECRET")?)
//!     .await?;
//! println!("{:?}", client.balances().await?);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod models;

pub use api::{
    ApiError, BitfinexClient, BitfinexV2Client, BittrexClient, ClientConfig, Credentials, Exchange,
    RateLimitConfig,
};
pub use models::{
    Balances, OrderDetails, OrderId, OrderRequest, OrderStatus, OrderType, Pair, Side, Ticker, Trade,
};
