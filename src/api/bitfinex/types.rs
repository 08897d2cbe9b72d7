use serde::{de, Deserialize, Deserializer, Serialize};

/// Error body returned with 4xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct BitfinexErrorBody {
    pub message: String,
}

/// `/pubticker/<symbol>`; all numbers are decimal strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitfinexTicker {
    pub mid: Option<String>,
    pub bid: String,
    pub ask: String,
    pub last_price: String,
    pub low: String,
    pub high: String,
    pub volume: String,
    /// Unix seconds with fraction, e.g. "1574694475.0391238"
    pub timestamp: String,
}

/// Unix seconds sent either as a number or as a decimal string
fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(f64),
        Text(String),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Number(seconds) => Ok(seconds),
        Seconds::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

/// One entry of `/trades/<symbol>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitfinexTrade {
    #[serde(deserialize_with = "seconds")]
    pub timestamp: f64,
    pub tid: u64,
    pub price: String,
    pub amount: String,
    pub exchange: Option<String>,
    /// "buy" or "sell"
    #[serde(rename = "type")]
    pub trade_type: String,
}

/// One wallet line of `/balances`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitfinexBalance {
    /// "exchange", "trading" or "deposit"
    #[serde(rename = "type")]
    pub wallet_type: String,
    pub currency: String,
    pub amount: String,
    pub available: Option<String>,
}

/// One entry of `/symbols_details`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDetails {
    pub pair: String,
    pub minimum_order_size: String,
    pub maximum_order_size: String,
}

/// Payload of `/order/new`
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderPayload {
    pub symbol: String,
    pub amount: String,
    pub price: String,
    pub side: String,
    /// "exchange market", "exchange limit" or "exchange stop"
    #[serde(rename = "type")]
    pub order_type: String,
    pub exchange: String,
}

/// Order as returned by `/order/new`, `/order/status`, `/orders` and `/orders/hist`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitfinexOrder {
    pub id: u64,
    pub symbol: String,
    pub price: Option<String>,
    pub avg_execution_price: Option<String>,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    /// Unix seconds with fraction
    pub timestamp: String,
    pub is_live: bool,
    pub is_cancelled: bool,
    pub original_amount: String,
    pub remaining_amount: String,
    pub executed_amount: Option<String>,
}

/// Just the id of an order listing entry
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRef {
    pub id: u64,
}
