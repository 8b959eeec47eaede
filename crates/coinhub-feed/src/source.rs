//! Price sources: where delayed candles come from.
//!
//! Two providers, selected by configuration and injected at construction:
//! `LiveFeed` pulls from the upstream kline API, `FixtureData` serves a
//! deterministic built-in dataset. Both run the same delay transform, so
//! swapping providers never changes lag semantics.

use crate::client::KlineClient;
use crate::delay::delayed;
use crate::error::{FeedError, FeedResult};
use crate::interval::interval_minutes;
use coinhub_core::{Candle, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Interval used when resolving a single current price.
const PRICE_INTERVAL: &str = "1m";

/// Which price provider to construct. Set in the server config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Pull candles from the upstream kline API.
    LiveFeed,
    /// Serve the built-in deterministic dataset.
    #[default]
    FixtureData,
}

/// A source of delay-transformed candles.
pub trait PriceSource: Send + Sync {
    /// Delayed candles for an upstream feed symbol, newest-first
    /// (the delay transform's convention).
    fn delayed_candles<'a>(
        &'a self,
        feed_symbol: &'a str,
        interval: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, FeedResult<Vec<Candle>>>;

    /// Close price of the most recent delayed bar for a feed symbol.
    fn latest_close<'a>(&'a self, feed_symbol: &'a str) -> BoxFuture<'a, FeedResult<Money>> {
        Box::pin(async move {
            let bars = self.delayed_candles(feed_symbol, PRICE_INTERVAL, 1).await?;
            bars.first()
                .map(|bar| Money::new(bar.close))
                .ok_or_else(|| FeedError::NoData(feed_symbol.to_string()))
        })
    }
}

/// Live provider backed by the upstream kline API.
pub struct LiveFeed {
    client: KlineClient,
}

impl LiveFeed {
    pub fn new(client: KlineClient) -> Self {
        Self { client }
    }
}

impl PriceSource for LiveFeed {
    fn delayed_candles<'a>(
        &'a self,
        feed_symbol: &'a str,
        interval: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, FeedResult<Vec<Candle>>> {
        Box::pin(async move {
            // Fetch enough extra bars that the delay window still leaves
            // `limit` survivors; upstream caps a single request at 1000.
            let to_remove = (30 / interval_minutes(interval) + 1) as usize;
            let fetch = (limit + to_remove).min(1000);

            let raw = self.client.fetch_klines(feed_symbol, interval, fetch).await?;
            Ok(delayed(&raw, interval, limit).collect())
        })
    }
}

/// Fixture provider serving a deterministic dataset.
pub struct FixtureData {
    candles: Vec<Candle>,
}

impl FixtureData {
    /// Fixture over an explicit dataset (chronologically ordered).
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }
}

impl Default for FixtureData {
    fn default() -> Self {
        Self::new(fixture_candles())
    }
}

impl PriceSource for FixtureData {
    fn delayed_candles<'a>(
        &'a self,
        _feed_symbol: &'a str,
        interval: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, FeedResult<Vec<Candle>>> {
        Box::pin(async move { Ok(delayed(&self.candles, interval, limit).collect()) })
    }
}

/// Built-in dataset: 240 one-minute bars of a deterministic walk around
/// 43500, anchored at a fixed open time. Every run serves identical data.
pub fn fixture_candles() -> Vec<Candle> {
    const ANCHOR_SECS: i64 = 1_700_000_000;
    const BARS: usize = 240;

    let mut state: u64 = 0x5eed_c01d_cafe_f00d;
    let mut close = Decimal::new(43_500_00, 2); // 43500.00
    let mut candles = Vec::with_capacity(BARS);

    for i in 0..BARS {
        // xorshift64 walk, step in [-12.7, +12.8]
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let step = Decimal::new((state % 256) as i64 - 127, 1);

        let open = close;
        close = open + step;
        let (high, low) = if open > close {
            (open, close)
        } else {
            (close, open)
        };
        let volume = Decimal::new((state % 5000) as i64 + 100, 2);

        candles.push(Candle {
            time: ANCHOR_SECS + (i as i64) * 60,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    candles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_dataset_is_deterministic() {
        assert_eq!(fixture_candles(), fixture_candles());
        assert_eq!(fixture_candles().len(), 240);
    }

    #[test]
    fn test_fixture_dataset_is_chronological() {
        let candles = fixture_candles();
        assert!(candles.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[tokio::test]
    async fn test_fixture_latest_close_matches_delay_window() {
        let source = FixtureData::default();
        let candles = fixture_candles();

        // 1m price window removes the trailing 31 bars.
        let expected = candles[candles.len() - 32].close;
        let price = source.latest_close("BTCUSDT").await.unwrap();
        assert_eq!(price, Money::new(expected));
    }

    #[tokio::test]
    async fn test_fixture_delayed_candles_respects_limit() {
        let source = FixtureData::default();
        let bars = source.delayed_candles("BTCUSDT", "1m", 10).await.unwrap();
        assert_eq!(bars.len(), 10);
        assert!(bars.windows(2).all(|w| w[0].time > w[1].time));
    }

    #[tokio::test]
    async fn test_empty_fixture_has_no_price() {
        let source = FixtureData::new(Vec::new());
        let err = source.latest_close("BTCUSDT").await.unwrap_err();
        assert!(matches!(err, FeedError::NoData(_)));
    }

    #[test]
    fn test_provider_kind_config_names() {
        let live: ProviderKind = serde_json::from_str("\"live-feed\"").unwrap();
        let fixture: ProviderKind = serde_json::from_str("\"fixture-data\"").unwrap();
        assert_eq!(live, ProviderKind::LiveFeed);
        assert_eq!(fixture, ProviderKind::FixtureData);
    }
}
