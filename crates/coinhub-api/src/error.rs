//! API error responses.
//!
//! Each [`ErrorKind`] maps to one stable status/code pair so consumers
//! can branch on failures without parsing messages. The body shape is
//! `{"code": "...", "message": "...", "retryable": bool}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use coinhub_ledger::{ErrorKind, LedgerError};
use coinhub_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Ledger(err.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    retryable: bool,
}

/// Stable status/code pair for a ledger error kind.
fn ledger_status(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        ErrorKind::InvalidState => (StatusCode::CONFLICT, "invalid_state"),
        ErrorKind::InsufficientFunds => (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds"),
        ErrorKind::InsufficientHoldings => {
            (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_holdings")
        }
        ErrorKind::Upstream => (StatusCode::BAD_GATEWAY, "upstream_unavailable"),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "validation_error"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "conflict"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, retryable) = match &self {
            Self::Ledger(err) => {
                let (status, code) = ledger_status(err.kind());
                (status, code, err.is_retryable())
            }
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated", false),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden", false),
        };

        if status.is_server_error() {
            warn!(%status, code, error = %self, "Request failed");
        }

        let body = ErrorBody {
            code,
            message: self.to_string(),
            retryable,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinhub_core::CoinSymbol;
    use coinhub_feed::FeedError;

    #[test]
    fn test_status_pairs_are_distinct() {
        let kinds = [
            ErrorKind::NotFound,
            ErrorKind::InvalidState,
            ErrorKind::InsufficientFunds,
            ErrorKind::InsufficientHoldings,
            ErrorKind::Upstream,
            ErrorKind::Validation,
            ErrorKind::Conflict,
        ];
        let pairs: Vec<_> = kinds.into_iter().map(ledger_status).collect();
        for (i, a) in pairs.iter().enumerate() {
            for b in &pairs[i + 1..] {
                assert_ne!(a, b, "status/code pairs must be distinguishable");
            }
        }
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(LedgerError::CoinNotFound(CoinSymbol::new("BTCC")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_maps_to_502() {
        let err = ApiError::from(LedgerError::Feed(FeedError::Upstream("timeout".into())));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
