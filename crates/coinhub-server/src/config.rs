//! Application configuration.

use crate::error::{AppError, AppResult};
use coinhub_feed::ProviderKind;
use coinhub_telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Application configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Price data configuration.
    #[serde(default)]
    pub price: PriceConfig,
    /// Telemetry configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Seed data applied at startup.
    #[serde(default)]
    pub seed: SeedConfig,
}

fn default_listen_addr() -> SocketAddr {
    "127.0.0.1:8080".parse().expect("valid default address")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            price: PriceConfig::default(),
            telemetry: TelemetryConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: explicit path > `COINHUB_CONFIG` env var >
    /// built-in defaults.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let path = path
            .map(str::to_string)
            .or_else(|| std::env::var("COINHUB_CONFIG").ok());

        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {path}: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse {path}: {e}")))
    }
}

/// Price data provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceConfig {
    /// Which provider serves candles: `live-feed` or `fixture-data`.
    #[serde(default)]
    pub provider: ProviderKind,
    /// Upstream kline endpoint (live-feed only).
    #[serde(default = "default_kline_url")]
    pub kline_url: String,
}

fn default_kline_url() -> String {
    "https://api.binance.com/api/v3/klines".to_string()
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            kline_url: default_kline_url(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// `pretty` or `json`.
    #[serde(default)]
    pub log_format: LogFormatConfig,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info,coinhub=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormatConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

/// Serde-facing mirror of [`LogFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatConfig {
    #[default]
    Pretty,
    Json,
}

impl From<LogFormatConfig> for LogFormat {
    fn from(config: LogFormatConfig) -> Self {
        match config {
            LogFormatConfig::Pretty => LogFormat::Pretty,
            LogFormatConfig::Json => LogFormat::Json,
        }
    }
}

/// Seed data applied to an empty store at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Bootstrap admin account, created if absent.
    #[serde(default)]
    pub admin: Option<SeedAdmin>,
    /// Coin listings created at startup.
    #[serde(default)]
    pub coins: Vec<SeedCoin>,
    /// Savings rate plans created at startup.
    #[serde(default)]
    pub rate_plans: Vec<SeedRatePlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAdmin {
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCoin {
    pub symbol: String,
    pub feed_symbol: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRatePlan {
    pub name: String,
    pub term_months: u32,
    pub annual_rate: Decimal,
    pub min_amount: Decimal,
}
