use serde::Deserialize;
use serde_json::Value;

use super::types::{BittrexBalance, BittrexMarketSummary, BittrexOrder, BittrexTrade};
use crate::api::error::ApiError;
use crate::api::normalize::{iso8601_to_epoch, sort_most_recent_first};
use crate::models::{Balances, OrderDetails, OrderStatus, OrderType, Pair, Side, Ticker, Trade};

/// `Pair(BTC, USDT)` -> `USDT-BTC`
pub fn market_for(pair: &Pair) -> String {
    format!("{}-{}", pair.quote, pair.base)
}

/// `USDT-BTC` -> `Pair(BTC, USDT)`
pub fn pair_from_market(market: &str) -> Result<Pair, ApiError> {
    match market.split_once('-') {
        Some((quote, base)) if !quote.is_empty() && !base.is_empty() => Ok(Pair::new(base, quote)),
        _ => Err(ApiError::ParseError(format!("Unexpected market '{}'", market))),
    }
}

pub fn map_ticker(summary: &BittrexMarketSummary) -> Result<Ticker, ApiError> {
    Ok(Ticker {
        ask: summary.ask,
        bid: summary.bid,
        last: summary.last,
        high: summary.high,
        low: summary.low,
        volume: summary.volume,
        timestamp: iso8601_to_epoch("TimeStamp", &summary.time_stamp)?,
    })
}

pub fn map_trade(trade: &BittrexTrade) -> Result<Trade, ApiError> {
    Ok(Trade {
        quantity: trade.quantity,
        price: trade.price,
        side: trade.order_type.parse::<Side>().map_err(ApiError::ParseError)?,
        timestamp: iso8601_to_epoch("TimeStamp", &trade.time_stamp)?,
    })
}

fn parse_trade(row: &Value) -> Result<Trade, ApiError> {
    map_trade(&BittrexTrade::deserialize(row)?)
}

/// Map and sort the market history, skipping rows that do not parse
pub fn map_trades(rows: &[Value]) -> Vec<Trade> {
    let mut mapped: Vec<Trade> = rows
        .iter()
        .filter_map(|row| {
            parse_trade(row)
                .map_err(|e| log::warn!("Skipping Bittrex trade {}: {}", row.get("Id").unwrap_or(&Value::Null), e))
                .ok()
        })
        .collect();
    sort_most_recent_first(&mut mapped);
    mapped
}

pub fn map_balances(balances: &[BittrexBalance]) -> Balances {
    balances
        .iter()
        .map(|b| (b.currency.to_uppercase(), b.balance))
        .collect()
}

/// `LIMIT_BUY` -> `(Limit, Buy)`
fn parse_order_kind(kind: &str) -> Result<(OrderType, Side), ApiError> {
    let (order_type, side) = kind
        .split_once('_')
        .ok_or_else(|| ApiError::ParseError(format!("Unexpected order type '{}'", kind)))?;
    Ok((
        order_type.to_lowercase().parse().map_err(ApiError::ParseError)?,
        side.parse().map_err(ApiError::ParseError)?,
    ))
}

pub fn map_order(order: &BittrexOrder) -> Result<OrderDetails, ApiError> {
    let status = if order.is_open {
        OrderStatus::Active
    } else if order.cancel_initiated {
        OrderStatus::Canceled
    } else {
        OrderStatus::Executed
    };
    let (order_type, side) = parse_order_kind(&order.order_type)?;

    Ok(OrderDetails {
        pair: pair_from_market(&order.exchange)?,
        order_type,
        side,
        quantity: order.quantity,
        remaining: order.quantity_remaining,
        price: order.limit,
        timestamp_opened: iso8601_to_epoch("Opened", &order.opened)?,
        status,
    })
}
