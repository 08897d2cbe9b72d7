use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bittrex API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BittrexResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

/// `/public/getmarkets` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BittrexMarket {
    /// Quote first, e.g. "USDT-BTC"
    pub market_name: String,
    pub market_currency: Option<String>,
    pub base_currency: Option<String>,
    pub min_trade_size: f64,
    #[serde(default)]
    pub is_active: bool,
}

/// `/public/getmarketsummary` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BittrexMarketSummary {
    pub market_name: String,
    pub high: f64,
    pub low: f64,
    /// In market (base) currency
    pub volume: f64,
    pub last: f64,
    pub base_volume: Option<f64>,
    /// ISO8601 without offset, UTC
    pub time_stamp: String,
    pub bid: f64,
    pub ask: f64,
}

/// `/public/getmarkethistory` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BittrexTrade {
    pub id: u64,
    pub time_stamp: String,
    pub quantity: f64,
    pub price: f64,
    pub total: Option<f64>,
    pub fill_type: Option<String>,
    /// "BUY" or "SELL"
    pub order_type: String,
}

/// `/account/getbalances` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BittrexBalance {
    pub currency: String,
    pub balance: f64,
    pub available: Option<f64>,
    pub pending: Option<f64>,
}

/// Result of `/market/buylimit` and `/market/selllimit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BittrexPlacedOrder {
    pub uuid: String,
}

/// `/account/getorder` result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BittrexOrder {
    pub order_uuid: String,
    /// Market name, e.g. "BTC-LTC"
    pub exchange: String,
    /// e.g. "LIMIT_BUY"
    #[serde(rename = "Type")]
    pub order_type: String,
    pub quantity: f64,
    pub quantity_remaining: f64,
    /// Limit rate per unit
    pub limit: f64,
    /// Total cost so far
    pub price: Option<f64>,
    pub opened: String,
    pub closed: Option<String>,
    pub is_open: bool,
    pub cancel_initiated: bool,
}

/// Just the id of an order listing entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BittrexOrderRef {
    pub order_uuid: String,
}
