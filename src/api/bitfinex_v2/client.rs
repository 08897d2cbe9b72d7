use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tokio::sync::OnceCell;

use crate::api::{
    client::{ClientConfig, Exchange, RateLimitConfig},
    credentials::Credentials,
    error::ApiError,
    nonce::NonceGenerator,
    rate_limiter::RateLimiter,
    session::Session,
    transport::{build_url, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport},
};
use crate::models::{Balances, OrderDetails, OrderId, OrderRequest, Pair, Side, Ticker, Trade};

use super::{
    mapper::{
        error_message, listing_name, map_balances, map_order, map_ticker, map_trades,
        notification_data, notification_order, order_id, pair_from_listing, symbol_for,
    },
    signer::{auth_headers, requires_auth},
    types::{CancelOrderBody, OrdersQuery, Row, SubmitOrderBody},
};

const NAME: &str = "Bitfinex v2";
const PLATFORM_STATUS_ENDPOINT: &str = "v2/platform/status";
const PAIRS_ENDPOINT: &str = "v2/conf/pub:list:pair:exchange";
const TICKER_ENDPOINT: &str = "v2/ticker/";
const TRADES_ENDPOINT: &str = "v2/trades/";
const WALLETS_ENDPOINT: &str = "v2/auth/r/wallets";
const ORDERS_ENDPOINT: &str = "v2/auth/r/orders";
const ORDER_HISTORY_ENDPOINT: &str = "v2/auth/r/orders/hist";
const SUBMIT_ORDER_ENDPOINT: &str = "v2/auth/w/order/submit";
const CANCEL_ORDER_ENDPOINT: &str = "v2/auth/w/order/cancel";
const TRADES_LIMIT: u32 = 120;

/// Bitfinex REST API v2 client
pub struct BitfinexV2Client {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    rate_limiter: RateLimiter,
    nonce: NonceGenerator,
    session: Session,
    pairs: OnceCell<Vec<String>>,
}

impl BitfinexV2Client {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::bitfinex_v2())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            rate_limiter: RateLimiter::new(config.rate_limit),
            config,
            transport,
            nonce: NonceGenerator::new(),
            session: Session::new(),
            pairs: OnceCell::new(),
        }
    }

    /// Whether the platform reports itself operative
    pub async fn platform_status(&self) -> Result<bool, ApiError> {
        let status: Vec<i64> = self.get(PLATFORM_STATUS_ENDPOINT, &[]).await?;
        Ok(status.first() == Some(&1))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, ApiError> {
        let url = build_url(&self.config.base_url, path, params)?;

        self.rate_limiter.acquire().await;
        let response = self.transport.send(HttpRequest::get(url)).await?;
        parse_response(response)
    }

    /// Send a POST request with a JSON body. Requests under `v2/auth/` are
    /// signed over the exact body string that is sent.
    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let credentials = if requires_auth(path) {
            Some(self.session.signing_credentials()?)
        } else {
            None
        };
        let url = build_url(&self.config.base_url, path, &[])?;
        let body = serde_json::to_string(body)?;

        self.rate_limiter.acquire().await;

        // Nonce after the rate limiter so nonces follow send order
        let headers = auth_headers(credentials, path, self.nonce.next(), &body)?;

        let response = self
            .transport
            .send(HttpRequest::post(url).with_headers(headers).with_body(body))
            .await?;
        parse_response(response)
    }

    /// Listing names, e.g. `BTCUSD` or `TESTBTC:TESTUSD`
    async fn pair_names(&self) -> Result<&Vec<String>, ApiError> {
        self.pairs
            .get_or_try_init(|| async {
                let lists: Vec<Vec<String>> = self.get(PAIRS_ENDPOINT, &[]).await?;
                Ok::<_, ApiError>(lists.into_iter().next().unwrap_or_default())
            })
            .await
    }

    /// Venue symbol for a pair the exchange lists
    async fn make_symbol(&self, pair: &Pair) -> Result<String, ApiError> {
        if !self.pair_names().await?.contains(&listing_name(pair)) {
            return Err(ApiError::InvalidPair(pair.to_string()));
        }
        Ok(symbol_for(pair))
    }

    async fn fetch_balances(&self) -> Result<Balances, ApiError> {
        let rows: Vec<Row> = self.post(WALLETS_ENDPOINT, &json!({})).await?;
        map_balances(&rows)
    }

    async fn order_ids(&self, path: &str) -> Result<Vec<OrderId>, ApiError> {
        self.session.require()?;
        let rows: Vec<Row> = self.post(path, &OrdersQuery::default()).await?;
        rows.iter()
            .map(|row| order_id(row).map(|id| id.to_string()))
            .collect()
    }
}

fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        let message = error_message(&response.body).unwrap_or_else(|| format!("HTTP {}", response.status));
        log::warn!("Bitfinex v2 request failed ({}): {}", response.status, message);
        return Err(ApiError::request_failed(Some(response.status), message));
    }

    serde_json::from_str(&response.body).map_err(|e| {
        ApiError::ParseError(format!("Failed to parse response: {} - Body: {}", e, response.body))
    })
}

fn parse_order_id(order_id: &str) -> Result<u64, ApiError> {
    order_id
        .parse::<u64>()
        .map_err(|_| ApiError::InvalidOrder(format!("Bitfinex order IDs are numeric, got '{}'", order_id)))
}

fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[async_trait]
impl Exchange for BitfinexV2Client {
    fn name(&self) -> &str {
        NAME
    }

    async fn authenticate(&mut self, credentials: Credentials) -> Result<(), ApiError> {
        self.session.begin(credentials)?;
        let probe = self.fetch_balances().await;
        self.session.finish(NAME, probe)
    }

    fn unauthenticate(&mut self) {
        self.session.reset();
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    async fn pairs(&self) -> Result<Vec<Pair>, ApiError> {
        let mut pairs = self
            .pair_names()
            .await?
            .iter()
            .map(|name| pair_from_listing(name))
            .collect::<Result<Vec<_>, _>>()?;
        pairs.sort();
        Ok(pairs)
    }

    async fn ticker(&self, pair: &Pair) -> Result<Ticker, ApiError> {
        let symbol = self.make_symbol(pair).await?;
        let row: Row = self.get(&format!("{}{}", TICKER_ENDPOINT, symbol), &[]).await?;
        map_ticker(&row, now_seconds())
    }

    async fn trades(&self, pair: &Pair) -> Result<Vec<Trade>, ApiError> {
        let symbol = self.make_symbol(pair).await?;
        let params = [
            ("limit", TRADES_LIMIT.to_string()),
            ("sort", "-1".to_string()),
        ];
        let rows: Vec<Row> = self.get(&format!("{}{}/hist", TRADES_ENDPOINT, symbol), &params).await?;
        Ok(map_trades(&rows))
    }

    async fn balances(&self) -> Result<Balances, ApiError> {
        self.session.require()?;
        self.fetch_balances().await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderId, ApiError> {
        self.session.require()?;
        order.validate().map_err(ApiError::InvalidOrder)?;

        let symbol = self.make_symbol(&order.pair).await?;
        let amount = match order.side {
            Side::Buy => order.amount,
            Side::Sell => -order.amount,
        };
        let body = SubmitOrderBody {
            order_type: format!("EXCHANGE {}", order.order_type.as_str().to_uppercase()),
            symbol,
            amount: amount.to_string(),
            price: order.price.map(|price| price.to_string()),
        };

        let notification: Row = self.post(SUBMIT_ORDER_ENDPOINT, &body).await?;
        let id = order_id(notification_order(notification_data(&notification)?)?)?;
        log::info!("Placed Bitfinex v2 order {} ({} {} {})", id, order.side, order.amount, order.pair);
        Ok(id.to_string())
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), ApiError> {
        self.session.require()?;
        let id = parse_order_id(order_id)?;
        let notification: Row = self.post(CANCEL_ORDER_ENDPOINT, &CancelOrderBody { id }).await?;
        notification_data(&notification)?;
        Ok(())
    }

    async fn order_details(&self, order_id: &str) -> Result<OrderDetails, ApiError> {
        self.session.require()?;
        let id = parse_order_id(order_id)?;
        let query = OrdersQuery { id: vec![id] };

        // Closed orders only show up in the history
        for path in [ORDERS_ENDPOINT, ORDER_HISTORY_ENDPOINT] {
            let rows: Vec<Row> = self.post(path, &query).await?;
            if let Some(row) = rows.iter().find(|row| super::mapper::order_id(row).ok() == Some(id)) {
                return map_order(row);
            }
        }
        Err(ApiError::OrderNotFound(order_id.to_string()))
    }

    async fn active_orders(&self) -> Result<Vec<OrderId>, ApiError> {
        self.order_ids(ORDERS_ENDPOINT).await
    }

    async fn past_orders(&self) -> Result<Vec<OrderId>, ApiError> {
        self.order_ids(ORDER_HISTORY_ENDPOINT).await
    }

    fn rate_limit(&self) -> RateLimitConfig {
        self.config.rate_limit
    }
}
