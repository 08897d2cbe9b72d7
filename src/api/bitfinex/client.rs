use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use crate::api::{
    client::{ClientConfig, Exchange, RateLimitConfig},
    credentials::Credentials,
    error::ApiError,
    nonce::NonceGenerator,
    normalize::parse_f64,
    rate_limiter::RateLimiter,
    session::Session,
    transport::{build_url, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport},
};
use crate::models::{Balances, OrderDetails, OrderId, OrderRequest, OrderType, Pair, Ticker, Trade};

use super::{
    mapper::{map_balances, map_order, map_ticker, map_trades, pair_from_symbol, symbol_for},
    signer::{auth_headers, build_payload},
    types::{
        BitfinexBalance, BitfinexErrorBody, BitfinexOrder, BitfinexTicker,
        NewOrderPayload, OrderRef, SymbolDetails,
    },
};

const NAME: &str = "Bitfinex";
const SYMBOLS_ENDPOINT: &str = "/symbols";
const SYMBOLS_DETAILS_ENDPOINT: &str = "/symbols_details";
const TICKER_ENDPOINT: &str = "/pubticker/";
const TRADES_ENDPOINT: &str = "/trades/";
const BALANCES_ENDPOINT: &str = "/balances";
const NEW_ORDER_ENDPOINT: &str = "/order/new";
const CANCEL_ORDER_ENDPOINT: &str = "/order/cancel";
const ORDER_STATUS_ENDPOINT: &str = "/order/status";
const ACTIVE_ORDERS_ENDPOINT: &str = "/orders";
const ORDER_HISTORY_ENDPOINT: &str = "/orders/hist";
const TRADES_LIMIT: u32 = 50;

/// Bitfinex REST API v1 client
pub struct BitfinexClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    rate_limiter: RateLimiter,
    nonce: NonceGenerator,
    session: Session,
    symbols: OnceCell<Vec<String>>,
    symbol_details: OnceCell<HashMap<String, SymbolDetails>>,
}

impl BitfinexClient {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::bitfinex())
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
            symbols: OnceCell::new(),
            symbol_details: OnceCell::new(),
        }
    }

    /// Send a public GET request
    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, ApiError> {
        let url = build_url(&self.config.base_url, path, params)?;

        self.rate_limiter.acquire().await;
        let response = self.transport.send(HttpRequest::get(url)).await?;
        parse_response(response)
    }

    /// Send an authenticated POST request. Nonce and request path are added
    /// to the payload automatically.
    async fn post<T: DeserializeOwned>(&self, path: &str, fields: Map<String, Value>) -> Result<T, ApiError> {
        let credentials = self.session.signing_credentials()?;
        let url = build_url(&self.config.base_url, path, &[])?;

        self.rate_limiter.acquire().await;

        // Nonce after the rate limiter so nonces follow send order
        let payload = build_payload(path, self.nonce.next(), fields);
        let headers = auth_headers(Some(credentials), &payload)?;

        let response = self
            .transport
            .send(HttpRequest::post(url).with_headers(headers))
            .await?;
        parse_response(response)
    }

    async fn symbols(&self) -> Result<&Vec<String>, ApiError> {
        self.symbols
            .get_or_try_init(|| self.get::<Vec<String>>(SYMBOLS_ENDPOINT, &[]))
            .await
    }

    async fn symbol_details(&self, symbol: &str) -> Result<&SymbolDetails, ApiError> {
        let details = self
            .symbol_details
            .get_or_try_init(|| async {
                let details: Vec<SymbolDetails> = self.get(SYMBOLS_DETAILS_ENDPOINT, &[]).await?;
                Ok::<_, ApiError>(details.into_iter().map(|d| (d.pair.clone(), d)).collect())
            })
            .await?;

        details
            .get(symbol)
            .ok_or_else(|| ApiError::InvalidPair(symbol.to_string()))
    }

    /// Venue symbol for a pair the exchange lists
    async fn make_symbol(&self, pair: &Pair) -> Result<String, ApiError> {
        let symbol = symbol_for(pair);
        if !self.symbols().await?.contains(&symbol) {
            return Err(ApiError::InvalidPair(pair.to_string()));
        }
        Ok(symbol)
    }

    async fn fetch_balances(&self) -> Result<Balances, ApiError> {
        let balances: Vec<BitfinexBalance> = self.post(BALANCES_ENDPOINT, Map::new()).await?;
        map_balances(&balances)
    }

    async fn order_ids(&self, path: &str) -> Result<Vec<OrderId>, ApiError> {
        self.session.require()?;
        let orders: Vec<OrderRef> = self.post(path, Map::new()).await?;
        Ok(orders.into_iter().map(|o| o.id.to_string()).collect())
    }
}

/// Turn a raw response into `T`, or a `RequestFailed` carrying the remote
/// message for non-2xx statuses
fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        let message = serde_json::from_str::<BitfinexErrorBody>(&response.body)
            .map(|body| body.message)
            .unwrap_or_else(|_| format!("HTTP {}", response.status));
        log::warn!("Bitfinex request failed ({}): {}", response.status, message);
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

fn order_id_fields(order_id: u64) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("order_id".to_string(), Value::from(order_id));
    fields
}

#[async_trait]
impl Exchange for BitfinexClient {
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
            .symbols()
            .await?
            .iter()
            .map(|symbol| pair_from_symbol(symbol))
            .collect::<Result<Vec<_>, _>>()?;
        pairs.sort();
        Ok(pairs)
    }

    async fn ticker(&self, pair: &Pair) -> Result<Ticker, ApiError> {
        let symbol = self.make_symbol(pair).await?;
        let ticker: BitfinexTicker = self.get(&format!("{}{}", TICKER_ENDPOINT, symbol), &[]).await?;
        map_ticker(&ticker)
    }

    async fn trades(&self, pair: &Pair) -> Result<Vec<Trade>, ApiError> {
        let symbol = self.make_symbol(pair).await?;
        let params = [
            ("timestamp", "0".to_string()),
            ("limit_trades", TRADES_LIMIT.to_string()),
        ];
        let rows: Vec<Value> = self.get(&format!("{}{}", TRADES_ENDPOINT, symbol), &params).await?;
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
        let details = self.symbol_details(&symbol).await?;
        let min_order_size = parse_f64("minimum_order_size", &details.minimum_order_size)?;
        let max_order_size = parse_f64("maximum_order_size", &details.maximum_order_size)?;
        if order.amount < min_order_size {
            return Err(ApiError::InvalidOrder(format!("Minimum order size is {}", min_order_size)));
        }
        if order.amount > max_order_size {
            return Err(ApiError::InvalidOrder(format!("Maximum order size is {}", max_order_size)));
        }

        // Market orders still need a price field; the exchange ignores it
        let price = match (order.order_type, order.price) {
            (OrderType::Market, _) | (_, None) => "1.0".to_string(),
            (_, Some(price)) => price.to_string(),
        };
        let payload = NewOrderPayload {
            symbol,
            amount: order.amount.to_string(),
            price,
            side: order.side.to_string(),
            order_type: format!("exchange {}", order.order_type),
            exchange: "bitfinex".to_string(),
        };
        let fields = match serde_json::to_value(&payload)? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        let placed: OrderRef = self.post(NEW_ORDER_ENDPOINT, fields).await?;
        log::info!("Placed Bitfinex order {} ({} {} {})", placed.id, order.side, order.amount, order.pair);
        Ok(placed.id.to_string())
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), ApiError> {
        self.session.require()?;
        let id = parse_order_id(order_id)?;
        let _: Value = self.post(CANCEL_ORDER_ENDPOINT, order_id_fields(id)).await?;
        Ok(())
    }

    async fn order_details(&self, order_id: &str) -> Result<OrderDetails, ApiError> {
        self.session.require()?;
        let id = parse_order_id(order_id)?;
        let order: BitfinexOrder = self.post(ORDER_STATUS_ENDPOINT, order_id_fields(id)).await?;
        map_order(&order)
    }

    async fn active_orders(&self) -> Result<Vec<OrderId>, ApiError> {
        self.order_ids(ACTIVE_ORDERS_ENDPOINT).await
    }

    async fn past_orders(&self) -> Result<Vec<OrderId>, ApiError> {
        self.order_ids(ORDER_HISTORY_ENDPOINT).await
    }

    fn rate_limit(&self) -> RateLimitConfig {
        self.config.rate_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::signing::hmac_sha384_hex;
    use crate::api::transport::mock::MockTransport;
    use crate::models::Side;
    use base64::{engine::general_purpose, Engine as _};
    use reqwest::Method;

    const SYMBOLS: &str = r#"["btcusd","ethusd","ethbtc"]"#;
    const SYMBOLS_DETAILS: &str = r#"[
        {"pair":"btcusd","price_precision":5,"initial_margin":"30.0","minimum_margin":"15.0","maximum_order_size":"2000.0","minimum_order_size":"0.01","expiration":"NA"},
        {"pair":"ethusd","price_precision":5,"initial_margin":"30.0","minimum_margin":"15.0","maximum_order_size":"5000.0","minimum_order_size":"0.1","expiration":"NA"}
    ]"#;
    const BALANCES: &str = r#"[{"type":"exchange","currency":"btc","amount":"0.5","available":"0.5"}]"#;

    fn client(transport: &Arc<MockTransport>) -> BitfinexClient {
        BitfinexClient::with_transport(ClientConfig::bitfinex(), transport.clone())
    }

    async fn authenticated(transport: &Arc<MockTransport>) -> BitfinexClient {
        let mut client = client(transport);
        client
            .authenticate(Credentials::new("key", "secret").unwrap())
            .await
            .unwrap();
        client
    }

    fn decoded_payload(request: &HttpRequest) -> Value {
        let encoded = request.headers["X-BFX-PAYLOAD"].to_str().unwrap();
        serde_json::from_slice(&general_purpose::STANDARD.decode(encoded).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_pairs_from_symbols() {
        let transport = Arc::new(MockTransport::new().respond(200, SYMBOLS));
        let client = client(&transport);

        let pairs = client.pairs().await.unwrap();
        assert_eq!(
            pairs,
            vec![Pair::new("BTC", "USD"), Pair::new("ETH", "BTC"), Pair::new("ETH", "USD")]
        );
        assert_eq!(transport.requests()[0].url, "https://api.bitfinex.com/v1/symbols");
    }

    #[tokio::test]
    async fn test_symbols_are_cached() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, SYMBOLS)
                .respond(200, r#"{"mid":"1","bid":"1","ask":"1","last_price":"1","low":"1","high":"1","volume":"1","timestamp":"1.0"}"#),
        );
        let client = client(&transport);

        client.pairs().await.unwrap();
        client.ticker(&Pair::new("BTC", "USD")).await.unwrap();
        assert_eq!(transport.request_count(), 2);
        assert_eq!(
            transport.requests()[1].url,
            "https://api.bitfinex.com/v1/pubticker/btcusd"
        );
    }

    #[tokio::test]
    async fn test_unknown_pair_is_rejected() {
        let transport = Arc::new(MockTransport::new().respond(200, SYMBOLS));
        let client = client(&transport);

        let err = client.ticker(&Pair::new("XRP", "EUR")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidPair(_)));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_trades_request_and_order() {
        let transport = Arc::new(MockTransport::new().respond(200, SYMBOLS).respond(
            200,
            r#"[
                {"timestamp":100,"tid":1,"price":"10.0","amount":"1.0","exchange":"bitfinex","type":"buy"},
                {"timestamp":300,"tid":2,"price":"11.0","amount":"2.0","exchange":"bitfinex","type":"sell"},
                {"timestamp":200,"tid":3,"price":"12.0","amount":"3.0","exchange":"bitfinex","type":"buy"}
            ]"#,
        ));
        let client = client(&transport);

        let trades = client.trades(&Pair::new("BTC", "USD")).await.unwrap();
        let timestamps: Vec<f64> = trades.iter().map(|t| t.timestamp).collect();
        assert_eq!(timestamps, vec![300.0, 200.0, 100.0]);
        assert_eq!(
            transport.requests()[1].url,
            "https://api.bitfinex.com/v1/trades/btcusd?timestamp=0&limit_trades=50"
        );
    }

    #[tokio::test]
    async fn test_trades_skip_row_with_null_price() {
        let transport = Arc::new(MockTransport::new().respond(200, SYMBOLS).respond(
            200,
            r#"[
                {"timestamp":100,"tid":1,"price":"10.0","amount":"1.0","exchange":"bitfinex","type":"buy"},
                {"timestamp":200,"tid":2,"price":null,"amount":"2.0","exchange":"bitfinex","type":"sell"}
            ]"#,
        ));
        let client = client(&transport);

        let trades = client.trades(&Pair::new("BTC", "USD")).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, 10.0);
        assert_eq!(trades[0].timestamp, 100.0);
    }

    #[tokio::test]
    async fn test_colon_symbol_pairs_are_tradeable() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, r#"["btcusd","dusk:usd"]"#)
                .respond(200, "[]"),
        );
        let client = client(&transport);

        let pairs = client.pairs().await.unwrap();
        assert_eq!(pairs, vec![Pair::new("BTC", "USD"), Pair::new("DUSK", "USD")]);

        assert!(client.trades(&Pair::new("DUSK", "USD")).await.unwrap().is_empty());
        assert_eq!(
            transport.requests()[1].url,
            "https://api.bitfinex.com/v1/trades/dusk:usd?timestamp=0&limit_trades=50"
        );
    }

    #[tokio::test]
    async fn test_authenticated_calls_fail_fast_without_credentials() {
        let transport = Arc::new(MockTransport::new());
        let client = client(&transport);
        let order = OrderRequest::market(Pair::new("BTC", "USD"), Side::Buy, 1.0);

        assert!(matches!(client.balances().await, Err(ApiError::NotAuthenticated)));
        assert!(matches!(client.place_order(&order).await, Err(ApiError::NotAuthenticated)));
        assert!(matches!(client.cancel_order("1").await, Err(ApiError::NotAuthenticated)));
        assert!(matches!(client.order_details("1").await, Err(ApiError::NotAuthenticated)));
        assert!(matches!(client.active_orders().await, Err(ApiError::NotAuthenticated)));
        assert!(matches!(client.past_orders().await, Err(ApiError::NotAuthenticated)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_authenticate_probes_balances_and_signs() {
        let transport = Arc::new(MockTransport::new().respond(200, BALANCES));
        let client = authenticated(&transport).await;
        assert!(client.is_authenticated());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://api.bitfinex.com/v1/balances");

        let payload = decoded_payload(request);
        assert_eq!(payload["request"], "/v1/balances");
        assert!(payload["nonce"].as_str().unwrap().parse::<u64>().is_ok());

        let encoded = request.headers["X-BFX-PAYLOAD"].to_str().unwrap();
        assert_eq!(
            request.headers["X-BFX-SIGNATURE"].to_str().unwrap(),
            hmac_sha384_hex(b"secret", encoded.as_bytes())
        );
        assert_eq!(request.headers["X-BFX-APIKEY"].to_str().unwrap(), "key");
    }

    #[tokio::test]
    async fn test_invalid_credentials() {
        let transport = Arc::new(
            MockTransport::new().respond(400, r#"{"message":"Could not find a key matching the given X-BFX-APIKEY."}"#),
        );
        let mut client = client(&transport);

        let err = client
            .authenticate(Credentials::new("key", "wrong-secret").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
        assert!(!client.is_authenticated());
        assert!(matches!(client.balances().await, Err(ApiError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_authenticate_twice_fails() {
        let transport = Arc::new(MockTransport::new().respond(200, BALANCES));
        let mut client = authenticated(&transport).await;

        let err = client
            .authenticate(Credentials::new("key", "secret").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AlreadyAuthenticated));

        client.unauthenticate();
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_nonces_increase_across_requests() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, BALANCES)
                .respond(200, BALANCES)
                .respond(200, "[]"),
        );
        let client = authenticated(&transport).await;
        client.balances().await.unwrap();
        client.active_orders().await.unwrap();

        let nonces: Vec<u64> = transport
            .requests()
            .iter()
            .map(|r| decoded_payload(r)["nonce"].as_str().unwrap().parse().unwrap())
            .collect();
        assert_eq!(nonces.len(), 3);
        assert!(nonces.windows(2).all(|w| w[1] > w[0]));
    }

    #[tokio::test]
    async fn test_place_limit_order() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, BALANCES)
                .respond(200, SYMBOLS)
                .respond(200, SYMBOLS_DETAILS)
                .respond(200, r#"{"id":448364249,"symbol":"btcusd","price":"9000.0","side":"sell","type":"exchange limit","timestamp":"1444272165.252370982","is_live":true,"is_cancelled":false,"original_amount":"0.5","remaining_amount":"0.5","order_id":448364249}"#),
        );
        let client = authenticated(&transport).await;
        let order = OrderRequest::limit(Pair::new("BTC", "USD"), Side::Sell, 0.5, 9000.5);

        let id = client.place_order(&order).await.unwrap();
        assert_eq!(id, "448364249");

        let payload = decoded_payload(&transport.requests()[3]);
        assert_eq!(payload["request"], "/v1/order/new");
        assert_eq!(payload["symbol"], "btcusd");
        assert_eq!(payload["amount"], "0.5");
        assert_eq!(payload["price"], "9000.5");
        assert_eq!(payload["side"], "sell");
        assert_eq!(payload["type"], "exchange limit");
        assert_eq!(payload["exchange"], "bitfinex");
    }

    #[tokio::test]
    async fn test_market_order_sends_placeholder_price() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, BALANCES)
                .respond(200, SYMBOLS)
                .respond(200, SYMBOLS_DETAILS)
                .respond(200, r#"{"id":7}"#),
        );
        let client = authenticated(&transport).await;
        let order = OrderRequest::market(Pair::new("ETH", "USD"), Side::Buy, 2.0);

        assert_eq!(client.place_order(&order).await.unwrap(), "7");
        let payload = decoded_payload(&transport.requests()[3]);
        assert_eq!(payload["price"], "1.0");
        assert_eq!(payload["type"], "exchange market");
    }

    #[tokio::test]
    async fn test_order_size_limits() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, BALANCES)
                .respond(200, SYMBOLS)
                .respond(200, SYMBOLS_DETAILS),
        );
        let client = authenticated(&transport).await;

        let too_small = OrderRequest::limit(Pair::new("BTC", "USD"), Side::Buy, 0.001, 100.0);
        let err = client.place_order(&too_small).await.unwrap_err();
        assert!(err.to_string().contains("Minimum order size is 0.01"));

        let too_big = OrderRequest::limit(Pair::new("BTC", "USD"), Side::Buy, 2500.0, 100.0);
        let err = client.place_order(&too_big).await.unwrap_err();
        assert!(err.to_string().contains("Maximum order size is 2000"));

        // Reference data fetched once, no order sent
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_invalid_order_rejected_before_network() {
        let transport = Arc::new(MockTransport::new().respond(200, BALANCES));
        let client = authenticated(&transport).await;

        let mut order = OrderRequest::market(Pair::new("BTC", "USD"), Side::Buy, 1.0);
        order.price = Some(10.0);
        assert!(matches!(client.place_order(&order).await, Err(ApiError::InvalidOrder(_))));
        assert!(matches!(client.cancel_order("abc").await, Err(ApiError::InvalidOrder(_))));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_order_details_and_listing() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, BALANCES)
                .respond(200, r#"{"id":448411153,"symbol":"ethbtc","price":"0.05","avg_execution_price":"0.0","side":"buy","type":"exchange stop","timestamp":"1444276570.0","is_live":false,"is_cancelled":true,"is_hidden":false,"was_forced":false,"original_amount":"1.0","remaining_amount":"1.0","executed_amount":"0.0"}"#)
                .respond(200, r#"[{"id":1,"symbol":"btcusd"},{"id":2,"symbol":"ethusd"}]"#)
                .respond(200, r#"[{"id":3}]"#)
                .respond(200, r#"{"id":448411153,"result":"ok"}"#),
        );
        let client = authenticated(&transport).await;

        let details = client.order_details("448411153").await.unwrap();
        assert_eq!(details.pair, Pair::new("ETH", "BTC"));
        assert_eq!(details.order_type, OrderType::Stop);
        assert_eq!(details.status, crate::models::OrderStatus::Canceled);

        assert_eq!(client.active_orders().await.unwrap(), vec!["1", "2"]);
        assert_eq!(client.past_orders().await.unwrap(), vec!["3"]);
        client.cancel_order("448411153").await.unwrap();

        let requests = transport.requests();
        assert_eq!(decoded_payload(&requests[1])["order_id"], 448411153);
        assert_eq!(requests[2].url, "https://api.bitfinex.com/v1/orders");
        assert_eq!(requests[3].url, "https://api.bitfinex.com/v1/orders/hist");
        assert_eq!(decoded_payload(&requests[4])["request"], "/v1/order/cancel");
    }

    #[tokio::test]
    async fn test_remote_error_message_is_surfaced() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, BALANCES)
                .respond(400, r#"{"message":"Order could not be cancelled."}"#)
                .respond(500, "<html>oops</html>"),
        );
        let client = authenticated(&transport).await;

        match client.cancel_order("1").await.unwrap_err() {
            ApiError::RequestFailed { status, message } => {
                assert_eq!(status, Some(400));
                assert_eq!(message, "Order could not be cancelled.");
            }
            other => panic!("unexpected error {:?}", other),
        }

        match client.balances().await.unwrap_err() {
            ApiError::RequestFailed { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "HTTP 500");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
