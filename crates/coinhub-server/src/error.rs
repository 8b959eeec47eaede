//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] coinhub_feed::FeedError),

    #[error("Store error: {0}")]
    Store(#[from] coinhub_store::StoreError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] coinhub_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
