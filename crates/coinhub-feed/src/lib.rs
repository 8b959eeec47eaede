//! Upstream market data for coinhub.
//!
//! Fetches candlestick (kline) data from an upstream exchange REST API,
//! parses it defensively, and serves it through the 30-minute delay
//! transform that both price consumers (the chart endpoint and the price
//! oracle) read from. Providers are selected by configuration: a live
//! HTTP feed or a deterministic built-in fixture dataset.

pub mod client;
pub mod delay;
pub mod error;
pub mod interval;
pub mod source;

pub use client::KlineClient;
pub use delay::{delayed, DelayedCandles, REPORTING_LAG_SECS};
pub use error::{FeedError, FeedResult};
pub use interval::{interval_minutes, is_known_interval, KNOWN_INTERVALS};
pub use source::{fixture_candles, BoxFuture, FixtureData, LiveFeed, PriceSource, ProviderKind};
