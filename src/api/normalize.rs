use chrono::{DateTime, NaiveDateTime};

use super::error::ApiError;
use crate::models::Trade;

/// Parse a decimal string field
pub fn parse_f64(field: &str, value: &str) -> Result<f64, ApiError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| ApiError::ParseError(format!("Invalid {} '{}': {}", field, value, e)))
}

/// ISO8601 timestamp -> Unix seconds.
///
/// Values without an offset (`2014-07-09T07:19:30.15`) are taken as UTC.
pub fn iso8601_to_epoch(field: &str, value: &str) -> Result<f64, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(micros_to_seconds(dt.timestamp_micros()));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| micros_to_seconds(naive.and_utc().timestamp_micros()))
        .map_err(|e| ApiError::ParseError(format!("Invalid {} '{}': {}", field, value, e)))
}

pub fn millis_to_seconds(millis: i64) -> f64 {
    millis as f64 / 1_000.0
}

fn micros_to_seconds(micros: i64) -> f64 {
    micros as f64 / 1_000_000.0
}

/// Most recent first; ties keep source order
pub fn sort_most_recent_first(trades: &mut [Trade]) {
    trades.sort_by(|a, b| b.timestamp.total_cmp(&a.timestamp));
}
