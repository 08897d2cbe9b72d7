//! Bitfinex v2 responses are positional JSON arrays. Rows are kept as
//! `Vec<Value>` and read by column index, since the exchange appends
//! columns over time.

use serde::Serialize;
use serde_json::Value;

pub type Row = Vec<Value>;

/// `v2/ticker/<symbol>`
pub mod ticker {
    pub const BID: usize = 0;
    pub const ASK: usize = 2;
    pub const LAST_PRICE: usize = 6;
    pub const VOLUME: usize = 7;
    pub const HIGH: usize = 8;
    pub const LOW: usize = 9;
}

/// `v2/trades/<symbol>/hist`
pub mod trade {
    pub const ID: usize = 0;
    pub const MTS: usize = 1;
    /// Negative for sells
    pub const AMOUNT: usize = 2;
    pub const PRICE: usize = 3;
}

/// `v2/auth/r/wallets`
pub mod wallet {
    pub const TYPE: usize = 0;
    pub const CURRENCY: usize = 1;
    pub const BALANCE: usize = 2;
}

/// `v2/auth/r/orders` and `v2/auth/r/orders/hist`
pub mod order {
    pub const ID: usize = 0;
    pub const SYMBOL: usize = 3;
    pub const MTS_CREATE: usize = 4;
    /// Remaining, signed
    pub const AMOUNT: usize = 6;
    /// Original, signed
    pub const AMOUNT_ORIG: usize = 7;
    pub const TYPE: usize = 8;
    pub const STATUS: usize = 13;
    pub const PRICE: usize = 16;
}

/// Write endpoints answer with a notification
pub mod notification {
    pub const DATA: usize = 4;
    pub const STATUS: usize = 6;
    pub const TEXT: usize = 7;
}

/// Error body: `["error", CODE, MESSAGE]`
pub const ERROR_MESSAGE: usize = 2;

/// `v2/auth/w/order/submit` body
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOrderBody {
    #[serde(rename = "type")]
    pub order_type: String,
    pub symbol: String,
    /// Signed, negative for sells
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// `v2/auth/w/order/cancel` body
#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderBody {
    pub id: u64,
}

/// Order listing filter
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrdersQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub id: Vec<u64>,
}
