//! OHLCV candle as consumed by chart clients.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One candlestick bar.
///
/// `time` is the bar open time in unix seconds: the shape chart clients
/// consume directly. Numeric fields serialize as JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time, unix seconds.
    pub time: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub open: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub close: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub volume: Decimal,
}

impl Candle {
    /// Copy of this candle with its reported time shifted by `seconds`.
    pub fn shifted(&self, seconds: i64) -> Self {
        Self {
            time: self.time + seconds,
            ..*self
        }
    }
}
