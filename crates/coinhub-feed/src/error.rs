//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Upstream HTTP failure: connect error, timeout, non-2xx status.
    /// Retryable from the caller's point of view.
    #[error("Upstream feed unavailable: {0}")]
    Upstream(String),

    /// Upstream returned a body we could not make sense of.
    #[error("Malformed feed response: {0}")]
    Parse(String),

    /// Not enough bars survive the delay window to answer the request.
    /// A valid state for thin or freshly listed feeds, not a crash.
    #[error("No delayed price data available for {0}")]
    NoData(String),
}

pub type FeedResult<T> = Result<T, FeedError>;
