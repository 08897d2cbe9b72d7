use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::market::{Pair, Side};

/// Exchange-assigned order identifier.
///
/// Bitfinex uses integers and Bittrex uses UUIDs; both are carried as text.
pub type OrderId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::Stop => "stop",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            "stop" => Ok(OrderType::Stop),
            other => Err(format!("Unsupported order type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Active,
    Canceled,
    Executed,
}

/// A new order to place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub pair: Pair,
    pub side: Side,
    /// Amount of the base asset to buy or sell
    pub amount: f64,
    /// Price for one unit of base, in quote. None for market orders.
    pub price: Option<f64>,
    pub order_type: OrderType,
}

impl OrderRequest {
    pub fn market(pair: Pair, side: Side, amount: f64) -> Self {
        Self {
            pair,
            side,
            amount,
            price: None,
            order_type: OrderType::Market,
        }
    }

    pub fn limit(pair: Pair, side: Side, amount: f64, price: f64) -> Self {
        Self {
            pair,
            side,
            amount,
            price: Some(price),
            order_type: OrderType::Limit,
        }
    }

    pub fn stop(pair: Pair, side: Side, amount: f64, price: f64) -> Self {
        Self {
            pair,
            side,
            amount,
            price: Some(price),
            order_type: OrderType::Stop,
        }
    }

    /// Venue-independent sanity checks, run before anything is sent
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(format!("Order amount must be positive, got {}", self.amount));
        }

        match (self.order_type, self.price) {
            (OrderType::Market, Some(_)) => {
                Err("Do not provide price for market orders".to_string())
            }
            (OrderType::Market, None) => Ok(()),
            (order_type, None) => Err(format!("A {} order requires a price", order_type)),
            (_, Some(price)) if !price.is_finite() || price <= 0.0 => {
                Err(format!("Order price must be positive, got {}", price))
            }
            _ => Ok(()),
        }
    }
}

/// Normalized view of an order as reported by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub pair: Pair,
    pub order_type: OrderType,
    pub side: Side,
    pub quantity: f64,
    pub remaining: f64,
    pub price: f64,
    /// Unix seconds
    pub timestamp_opened: f64,
    pub status: OrderStatus,
}
