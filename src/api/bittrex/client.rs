use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::api::{
    client::{ClientConfig, Exchange, RateLimitConfig},
    credentials::Credentials,
    error::ApiError,
    nonce::NonceGenerator,
    rate_limiter::RateLimiter,
    session::Session,
    transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport},
};
use crate::models::{Balances, OrderDetails, OrderId, OrderRequest, OrderType, Pair, Side, Ticker, Trade};

use super::{
    mapper::{map_balances, map_order, map_ticker, map_trades, market_for, pair_from_market},
    signer::{auth_headers, public_url, signed_url},
    types::{
        BittrexBalance, BittrexMarket, BittrexMarketSummary, BittrexOrder, BittrexOrderRef,
        BittrexPlacedOrder, BittrexResponse,
    },
};

const NAME: &str = "Bittrex";
const MARKETS_ENDPOINT: &str = "/public/getmarkets";
const MARKET_SUMMARY_ENDPOINT: &str = "/public/getmarketsummary";
const MARKET_HISTORY_ENDPOINT: &str = "/public/getmarkethistory";
const BALANCES_ENDPOINT: &str = "/account/getbalances";
const BUY_LIMIT_ENDPOINT: &str = "/market/buylimit";
const SELL_LIMIT_ENDPOINT: &str = "/market/selllimit";
const CANCEL_ENDPOINT: &str = "/market/cancel";
const ORDER_ENDPOINT: &str = "/account/getorder";
const OPEN_ORDERS_ENDPOINT: &str = "/market/getopenorders";
const ORDER_HISTORY_ENDPOINT: &str = "/account/getorderhistory";

/// Bittrex REST API v1.1 client
pub struct BittrexClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    rate_limiter: RateLimiter,
    nonce: NonceGenerator,
    session: Session,
    markets: OnceCell<HashMap<String, BittrexMarket>>,
}

impl BittrexClient {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::bittrex())
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
            markets: OnceCell::new(),
        }
    }

    async fn public<T: DeserializeOwned>(&self, path: &str, params: Vec<(&str, String)>) -> Result<T, ApiError> {
        let url = public_url(&self.config.base_url, path, params)?;

        self.rate_limiter.acquire().await;
        let response = self.transport.send(HttpRequest::get(url)).await?;
        parse_response(response)
    }

    /// Send an authenticated GET request. `apikey` and `nonce` are added to
    /// the query string and the full URI is signed.
    async fn signed<T: DeserializeOwned>(&self, path: &str, params: Vec<(&str, String)>) -> Result<T, ApiError> {
        let credentials = self.session.signing_credentials()?;

        self.rate_limiter.acquire().await;

        let url = signed_url(&self.config.base_url, path, params, credentials, self.nonce.next())?;
        let headers = auth_headers(Some(credentials), &url)?;

        let response = self
            .transport
            .send(HttpRequest::get(url).with_headers(headers))
            .await?;
        parse_response(response)
    }

    async fn markets(&self) -> Result<&HashMap<String, BittrexMarket>, ApiError> {
        self.markets
            .get_or_try_init(|| async {
                let markets: Vec<BittrexMarket> = self.public(MARKETS_ENDPOINT, vec![]).await?;
                Ok::<_, ApiError>(markets.into_iter().map(|m| (m.market_name.clone(), m)).collect())
            })
            .await
    }

    /// Market listing for a pair the exchange lists
    async fn market(&self, pair: &Pair) -> Result<&BittrexMarket, ApiError> {
        self.markets()
            .await?
            .get(&market_for(pair))
            .ok_or_else(|| ApiError::InvalidPair(pair.to_string()))
    }

    async fn fetch_balances(&self) -> Result<Balances, ApiError> {
        let balances: Vec<BittrexBalance> = self.signed(BALANCES_ENDPOINT, vec![]).await?;
        Ok(map_balances(&balances))
    }

    async fn order_ids(&self, path: &str) -> Result<Vec<OrderId>, ApiError> {
        self.session.require()?;
        let orders: Vec<BittrexOrderRef> = self.signed(path, vec![]).await?;
        Ok(orders.into_iter().map(|o| o.order_uuid).collect())
    }
}

/// Unwrap the `{success, message, result}` envelope into `T`
fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let envelope = serde_json::from_str::<BittrexResponse>(&response.body);

    if !response.is_success() {
        let message = envelope
            .ok()
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        log::warn!("Bittrex request failed ({}): {}", response.status, message);
        return Err(ApiError::request_failed(Some(response.status), message));
    }

    let envelope = envelope.map_err(|e| {
        ApiError::ParseError(format!("Failed to parse response: {} - Body: {}", e, response.body))
    })?;
    if !envelope.success {
        log::warn!("Bittrex request unsuccessful: {}", envelope.message);
        return Err(ApiError::request_failed(Some(response.status), envelope.message));
    }

    serde_json::from_value(envelope.result)
        .map_err(|e| ApiError::ParseError(format!("Failed to parse result: {}", e)))
}

#[async_trait]
impl Exchange for BittrexClient {
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
            .markets()
            .await?
            .keys()
            .map(|market| pair_from_market(market))
            .collect::<Result<Vec<_>, _>>()?;
        pairs.sort();
        Ok(pairs)
    }

    async fn ticker(&self, pair: &Pair) -> Result<Ticker, ApiError> {
        let market = self.market(pair).await?.market_name.clone();
        let summaries: Vec<BittrexMarketSummary> = self
            .public(MARKET_SUMMARY_ENDPOINT, vec![("market", market)])
            .await?;
        let summary = summaries
            .first()
            .ok_or_else(|| ApiError::ParseError(format!("Empty market summary for {}", pair)))?;
        map_ticker(summary)
    }

    async fn trades(&self, pair: &Pair) -> Result<Vec<Trade>, ApiError> {
        let market = self.market(pair).await?.market_name.clone();
        let rows: Vec<Value> = self
            .public(MARKET_HISTORY_ENDPOINT, vec![("market", market)])
            .await?;
        Ok(map_trades(&rows))
    }

    async fn balances(&self) -> Result<Balances, ApiError> {
        self.session.require()?;
        self.fetch_balances().await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderId, ApiError> {
        self.session.require()?;
        order.validate().map_err(ApiError::InvalidOrder)?;
        if order.order_type != OrderType::Limit {
            return Err(ApiError::InvalidOrder("Only limit orders are allowed".to_string()));
        }
        let price = order
            .price
            .ok_or_else(|| ApiError::InvalidOrder("Limit orders need a price".to_string()))?;

        let market = self.market(&order.pair).await?;
        if order.amount < market.min_trade_size {
            return Err(ApiError::InvalidOrder(format!(
                "Minimum trade size is {}",
                market.min_trade_size
            )));
        }

        let endpoint = match order.side {
            Side::Buy => BUY_LIMIT_ENDPOINT,
            Side::Sell => SELL_LIMIT_ENDPOINT,
        };
        let params = vec![
            ("market", market.market_name.clone()),
            ("quantity", order.amount.to_string()),
            ("rate", price.to_string()),
        ];

        let placed: BittrexPlacedOrder = self.signed(endpoint, params).await?;
        log::info!("Placed Bittrex order {} ({} {} {})", placed.uuid, order.side, order.amount, order.pair);
        Ok(placed.uuid)
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), ApiError> {
        self.session.require()?;
        let _: Value = self
            .signed(CANCEL_ENDPOINT, vec![("uuid", order_id.to_string())])
            .await?;
        Ok(())
    }

    async fn order_details(&self, order_id: &str) -> Result<OrderDetails, ApiError> {
        self.session.require()?;
        let order: BittrexOrder = self
            .signed(ORDER_ENDPOINT, vec![("uuid", order_id.to_string())])
            .await?;
        map_order(&order)
    }

    async fn active_orders(&self) -> Result<Vec<OrderId>, ApiError> {
        self.order_ids(OPEN_ORDERS_ENDPOINT).await
    }

    async fn past_orders(&self) -> Result<Vec<OrderId>, ApiError> {
        self.order_ids(ORDER_HISTORY_ENDPOINT).await
    }

    fn rate_limit(&self) -> RateLimitConfig {
        self.config.rate_limit
    }
}
