use serde_json::Value;

use super::types::{notification, order, ticker, trade, wallet, Row, ERROR_MESSAGE};
use crate::api::error::ApiError;
use crate::api::normalize::{millis_to_seconds, sort_most_recent_first};
use crate::models::{Balances, OrderDetails, OrderStatus, OrderType, Pair, Side, Ticker, Trade};

/// `Pair(BTC, USD)` -> `tBTCUSD`; currencies longer than three letters
/// need the colon form, `tTESTBTC:TESTUSD`
pub fn symbol_for(pair: &Pair) -> String {
    format!("t{}", listing_name(pair))
}

/// Pair name as it appears in `v2/conf/pub:list:pair:exchange`
pub fn listing_name(pair: &Pair) -> String {
    if pair.base.len() > 3 || pair.quote.len() > 3 {
        format!("{}:{}", pair.base, pair.quote)
    } else {
        format!("{}{}", pair.base, pair.quote)
    }
}

/// `BTCUSD` or `TESTBTC:TESTUSD` -> `Pair`
pub fn pair_from_listing(name: &str) -> Result<Pair, ApiError> {
    if let Some((base, quote)) = name.split_once(':') {
        if !base.is_empty() && !quote.is_empty() {
            return Ok(Pair::new(base, quote));
        }
    } else if name.len() == 6 && name.is_ascii() {
        let (base, quote) = name.split_at(3);
        return Ok(Pair::new(base, quote));
    }
    Err(ApiError::ParseError(format!("Unexpected pair '{}'", name)))
}

/// `tBTCUSD` -> `Pair(BTC, USD)`
pub fn pair_from_symbol(symbol: &str) -> Result<Pair, ApiError> {
    let name = symbol
        .strip_prefix('t')
        .ok_or_else(|| ApiError::ParseError(format!("Not a trading symbol '{}'", symbol)))?;
    pair_from_listing(name)
}

fn number(row: &[Value], index: usize, field: &str) -> Result<f64, ApiError> {
    row.get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| ApiError::ParseError(format!("Missing or invalid {} at index {}", field, index)))
}

fn text<'a>(row: &'a [Value], index: usize, field: &str) -> Result<&'a str, ApiError> {
    row.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::ParseError(format!("Missing or invalid {} at index {}", field, index)))
}

fn side_of(amount: f64) -> Side {
    if amount < 0.0 { Side::Sell } else { Side::Buy }
}

/// Ticker rows carry no time; the caller supplies when it was fetched
pub fn map_ticker(row: &[Value], fetched_at: f64) -> Result<Ticker, ApiError> {
    Ok(Ticker {
        ask: number(row, ticker::ASK, "ASK")?,
        bid: number(row, ticker::BID, "BID")?,
        last: number(row, ticker::LAST_PRICE, "LAST_PRICE")?,
        high: number(row, ticker::HIGH, "HIGH")?,
        low: number(row, ticker::LOW, "LOW")?,
        volume: number(row, ticker::VOLUME, "VOLUME")?,
        timestamp: fetched_at,
    })
}

pub fn map_trade(row: &[Value]) -> Result<Trade, ApiError> {
    let amount = number(row, trade::AMOUNT, "AMOUNT")?;
    let millis = row
        .get(trade::MTS)
        .and_then(Value::as_i64)
        .ok_or_else(|| ApiError::ParseError("Missing or invalid MTS".to_string()))?;

    Ok(Trade {
        quantity: amount.abs(),
        price: number(row, trade::PRICE, "PRICE")?,
        side: side_of(amount),
        timestamp: millis_to_seconds(millis),
    })
}

/// Map and sort a trade listing, skipping rows that do not parse
pub fn map_trades(rows: &[Row]) -> Vec<Trade> {
    let mut mapped: Vec<Trade> = rows
        .iter()
        .filter_map(|row| match map_trade(row) {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("Skipping Bitfinex v2 trade {:?}: {}", row.get(trade::ID), e);
                None
            }
        })
        .collect();
    sort_most_recent_first(&mut mapped);
    mapped
}

pub fn map_balances(rows: &[Row]) -> Result<Balances, ApiError> {
    let mut balances = Balances::new();
    for row in rows {
        if text(row, wallet::TYPE, "WALLET_TYPE")? != "exchange" {
            continue;
        }
        let balance = number(row, wallet::BALANCE, "BALANCE")?;
        if balance > 0.0 {
            balances.insert(text(row, wallet::CURRENCY, "CURRENCY")?.to_uppercase(), balance);
        }
    }
    Ok(balances)
}

/// `ACTIVE`, `PARTIALLY FILLED @ ...`, `EXECUTED @ ...`, `CANCELED`
fn parse_status(status: &str) -> Result<OrderStatus, ApiError> {
    if status.starts_with("ACTIVE") || status.starts_with("PARTIALLY FILLED") {
        Ok(OrderStatus::Active)
    } else if status.starts_with("EXECUTED") {
        Ok(OrderStatus::Executed)
    } else if status.contains("CANCELED") {
        Ok(OrderStatus::Canceled)
    } else {
        Err(ApiError::ParseError(format!("Unknown order status '{}'", status)))
    }
}

pub fn order_id(row: &[Value]) -> Result<u64, ApiError> {
    row.get(order::ID)
        .and_then(Value::as_u64)
        .ok_or_else(|| ApiError::ParseError("Missing or invalid order ID".to_string()))
}

pub fn map_order(row: &[Value]) -> Result<OrderDetails, ApiError> {
    let original = number(row, order::AMOUNT_ORIG, "AMOUNT_ORIG")?;
    let order_type = text(row, order::TYPE, "TYPE")?;
    let order_type = order_type
        .strip_prefix("EXCHANGE ")
        .unwrap_or(order_type)
        .parse::<OrderType>()
        .map_err(ApiError::ParseError)?;
    let created = row
        .get(order::MTS_CREATE)
        .and_then(Value::as_i64)
        .ok_or_else(|| ApiError::ParseError("Missing or invalid MTS_CREATE".to_string()))?;

    Ok(OrderDetails {
        pair: pair_from_symbol(text(row, order::SYMBOL, "SYMBOL")?)?,
        order_type,
        side: side_of(original),
        quantity: original.abs(),
        remaining: number(row, order::AMOUNT, "AMOUNT")?.abs(),
        // Market orders report no price
        price: row.get(order::PRICE).and_then(Value::as_f64).unwrap_or(0.0),
        timestamp_opened: millis_to_seconds(created),
        status: parse_status(text(row, order::STATUS, "STATUS")?)?,
    })
}

/// Payload of a successful write notification
pub fn notification_data(row: &[Value]) -> Result<&Value, ApiError> {
    let status = text(row, notification::STATUS, "STATUS")?;
    if status != "SUCCESS" {
        let message = row
            .get(notification::TEXT)
            .and_then(Value::as_str)
            .unwrap_or(status);
        return Err(ApiError::request_failed(None, message));
    }
    row.get(notification::DATA)
        .ok_or_else(|| ApiError::ParseError("Missing notification data".to_string()))
}

/// Order row inside a notification; submit wraps it in a list, cancel
/// does not
pub fn notification_order(data: &Value) -> Result<&[Value], ApiError> {
    let rows = data
        .as_array()
        .ok_or_else(|| ApiError::ParseError("Notification data is not an array".to_string()))?;
    match rows.first() {
        Some(Value::Array(first)) => Ok(first.as_slice()),
        Some(_) => Ok(rows.as_slice()),
        None => Err(ApiError::ParseError("Empty notification data".to_string())),
    }
}

/// Message of an `["error", CODE, MESSAGE]` body
pub fn error_message(body: &str) -> Option<String> {
    let row: Row = serde_json::from_str(body).ok()?;
    if row.first().and_then(Value::as_str) != Some("error") {
        return None;
    }
    row.get(ERROR_MESSAGE).and_then(Value::as_str).map(str::to_string)
}
