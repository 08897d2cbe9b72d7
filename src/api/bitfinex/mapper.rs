use serde::Deserialize;
use serde_json::Value;

use super::types::{BitfinexBalance, BitfinexOrder, BitfinexTicker, BitfinexTrade};
use crate::api::error::ApiError;
use crate::api::normalize::{parse_f64, sort_most_recent_first};
use crate::models::{Balances, OrderDetails, OrderStatus, OrderType, Pair, Side, Ticker, Trade};

/// `Pair(BTC, USD)` -> `btcusd`; currencies longer than three letters
/// need the colon form, `dusk:usd`
pub fn symbol_for(pair: &Pair) -> String {
    let (base, quote) = (pair.base.to_lowercase(), pair.quote.to_lowercase());
    if base.len() > 3 || quote.len() > 3 {
        format!("{}:{}", base, quote)
    } else {
        format!("{}{}", base, quote)
    }
}

/// `btcusd` or `dusk:usd` -> `Pair`; without a colon the quote is the
/// last three letters
pub fn pair_from_symbol(symbol: &str) -> Result<Pair, ApiError> {
    if let Some((base, quote)) = symbol.split_once(':') {
        if !base.is_empty() && !quote.is_empty() {
            return Ok(Pair::new(base, quote));
        }
    } else if symbol.len() >= 6 && symbol.is_ascii() {
        let (base, quote) = symbol.split_at(symbol.len() - 3);
        return Ok(Pair::new(base, quote));
    }
    Err(ApiError::ParseError(format!("Unexpected symbol '{}'", symbol)))
}

pub fn map_ticker(ticker: &BitfinexTicker) -> Result<Ticker, ApiError> {
    Ok(Ticker {
        ask: parse_f64("ask", &ticker.ask)?,
        bid: parse_f64("bid", &ticker.bid)?,
        last: parse_f64("last_price", &ticker.last_price)?,
        high: parse_f64("high", &ticker.high)?,
        low: parse_f64("low", &ticker.low)?,
        volume: parse_f64("volume", &ticker.volume)?,
        timestamp: parse_f64("timestamp", &ticker.timestamp)?,
    })
}

pub fn map_trade(trade: &BitfinexTrade) -> Result<Trade, ApiError> {
    Ok(Trade {
        quantity: parse_f64("amount", &trade.amount)?,
        price: parse_f64("price", &trade.price)?,
        side: trade.trade_type.parse::<Side>().map_err(ApiError::ParseError)?,
        timestamp: trade.timestamp,
    })
}

fn parse_trade(row: &Value) -> Result<Trade, ApiError> {
    map_trade(&BitfinexTrade::deserialize(row)?)
}

/// Map and sort a trade listing, skipping rows that do not parse
pub fn map_trades(rows: &[Value]) -> Vec<Trade> {
    let mut mapped: Vec<Trade> = rows
        .iter()
        .filter_map(|row| match parse_trade(row) {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("Skipping Bitfinex trade {}: {}", row.get("tid").unwrap_or(&Value::Null), e);
                None
            }
        })
        .collect();
    sort_most_recent_first(&mut mapped);
    mapped
}

/// Only exchange wallets are reported; margin and funding wallets are not
pub fn map_balances(balances: &[BitfinexBalance]) -> Result<Balances, ApiError> {
    let mut mapped = Balances::new();
    for balance in balances.iter().filter(|b| b.wallet_type == "exchange") {
        let amount = parse_f64("amount", &balance.amount)?;
        if amount > 0.0 {
            mapped.insert(balance.currency.to_uppercase(), amount);
        }
    }
    Ok(mapped)
}

pub fn map_order(order: &BitfinexOrder) -> Result<OrderDetails, ApiError> {
    let status = if order.is_live {
        OrderStatus::Active
    } else if order.is_cancelled {
        OrderStatus::Canceled
    } else {
        OrderStatus::Executed
    };

    let order_type = order
        .order_type
        .trim_start_matches("exchange ")
        .parse::<OrderType>()
        .map_err(ApiError::ParseError)?;

    let price = match order.price.as_deref() {
        Some(price) => parse_f64("price", price)?,
        None => 0.0,
    };

    Ok(OrderDetails {
        pair: pair_from_symbol(&order.symbol)?,
        order_type,
        side: order.side.parse::<Side>().map_err(ApiError::ParseError)?,
        quantity: parse_f64("original_amount", &order.original_amount)?,
        remaining: parse_f64("remaining_amount", &order.remaining_amount)?,
        price,
        timestamp_opened: parse_f64("timestamp", &order.timestamp)?,
        status,
    })
}
