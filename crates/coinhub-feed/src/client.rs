//! HTTP client for the upstream kline API.
//!
//! Fetches raw candlestick arrays from a Binance-style REST endpoint:
//! `GET {base_url}?symbol=BTCUSDT&interval=1m&limit=500` returning
//! `[[openTimeMs, "open", "high", "low", "close", "volume", ...], ...]`.
//! The body is untrusted: rows that are too short or carry malformed
//! numbers are skipped with a warning rather than failing the request.

use crate::error::{FeedError, FeedResult};
use coinhub_core::Candle;
use reqwest::Client;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for upstream requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the upstream kline endpoint.
pub struct KlineClient {
    client: Client,
    base_url: String,
}

impl KlineClient {
    /// Create a new kline client.
    ///
    /// # Arguments
    /// * `base_url` - kline endpoint, e.g. "https://api.binance.com/api/v3/klines"
    pub fn new(base_url: impl Into<String>) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| FeedError::Upstream(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch candles for a feed symbol, oldest-first as upstream sends them.
    pub async fn fetch_klines(
        &self,
        feed_symbol: &str,
        interval: &str,
        limit: usize,
    ) -> FeedResult<Vec<Candle>> {
        debug!(url = %self.base_url, %feed_symbol, %interval, limit, "Fetching klines");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("symbol", feed_symbol.to_ascii_uppercase().as_str()),
                ("interval", interval),
                ("limit", limit.to_string().as_str()),
            ])
            .send()
            .await
            .map_err(|e| FeedError::Upstream(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Upstream(format!("HTTP {status}: {body}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FeedError::Parse(format!("Failed to parse response: {e}")))?;

        let rows = body
            .as_array()
            .ok_or_else(|| FeedError::Parse("kline response is not an array".to_string()))?;

        let mut candles = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            match parse_kline_row(row) {
                Some(candle) => candles.push(candle),
                None => warn!(idx, "Skipping malformed kline row"),
            }
        }

        debug!(count = candles.len(), "Parsed klines");
        Ok(candles)
    }
}

/// Parse one raw kline row. Rows shorter than 6 fields or with malformed
/// numbers yield `None`.
fn parse_kline_row(row: &serde_json::Value) -> Option<Candle> {
    let fields = row.as_array()?;
    if fields.len() < 6 {
        return None;
    }

    let open_time_ms = fields[0].as_i64()?;

    Some(Candle {
        // Upstream reports milliseconds; chart clients consume seconds.
        time: open_time_ms / 1000,
        open: decimal_field(&fields[1])?,
        high: decimal_field(&fields[2])?,
        low: decimal_field(&fields[3])?,
        close: decimal_field(&fields[4])?,
        volume: decimal_field(&fields[5])?,
    })
}

/// Upstream sends numeric fields as strings; tolerate plain numbers too.
fn decimal_field(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::String(s) => Decimal::from_str(s).ok(),
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_kline_row() {
        let row = json!([
            1700000000000i64,
            "43500.00",
            "43600.10",
            "43400.00",
            "43500.25",
            "123.456",
            1700000059999i64,
            "ignored-extra-fields"
        ]);

        let candle = parse_kline_row(&row).unwrap();
        assert_eq!(candle.time, 1_700_000_000);
        assert_eq!(candle.close, dec!(43500.25));
        assert_eq!(candle.volume, dec!(123.456));
    }

    #[test]
    fn test_parse_tolerates_plain_numbers() {
        let row = json!([1700000000000i64, 1.0, 2.0, 0.5, 1.5, 10]);
        let candle = parse_kline_row(&row).unwrap();
        assert_eq!(candle.close, dec!(1.5));
    }

    #[test]
    fn test_short_row_is_skipped() {
        let row = json!([1700000000000i64, "1", "2", "0.5"]);
        assert!(parse_kline_row(&row).is_none());
    }

    #[test]
    fn test_malformed_number_is_skipped() {
        let row = json!([1700000000000i64, "1", "2", "0.5", "not-a-number", "1"]);
        assert!(parse_kline_row(&row).is_none());

        let row = json!(["not-a-time", "1", "2", "0.5", "1", "1"]);
        assert!(parse_kline_row(&row).is_none());
    }

    #[test]
    fn test_non_array_row_is_skipped() {
        assert!(parse_kline_row(&json!({"open": 1})).is_none());
    }
}
