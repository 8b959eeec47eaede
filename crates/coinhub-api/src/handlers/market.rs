//! Delayed market data for chart clients.

use crate::error::{ApiError, ApiResult};
use crate::state::ApiState;
use axum::extract::{Query, State};
use axum::Json;
use coinhub_core::{Candle, CoinSymbol};
use coinhub_feed::is_known_interval;
use coinhub_ledger::LedgerError;
use serde::Deserialize;

const DEFAULT_INTERVAL: &str = "1h";
const DEFAULT_LIMIT: usize = 200;
const MAX_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct KlinesQuery {
    pub symbol: String,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `GET /v1/market/klines`: delay-transformed candles for a listed coin.
///
/// The delay transform yields newest-first; chart clients draw
/// oldest-first, so the bars are reversed here before serialization.
pub async fn get_klines(
    State(state): State<ApiState>,
    Query(query): Query<KlinesQuery>,
) -> ApiResult<Json<Vec<Candle>>> {
    let interval = query.interval.as_deref().unwrap_or(DEFAULT_INTERVAL);
    if !is_known_interval(interval) {
        return Err(ApiError::Ledger(LedgerError::Validation(format!(
            "unknown interval: {interval}"
        ))));
    }
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let symbol = CoinSymbol::new(&query.symbol);
    let coin = state.oracle.resolve_active(&symbol)?;

    let mut bars = state
        .source
        .delayed_candles(&coin.feed_symbol, interval, limit)
        .await
        .map_err(LedgerError::from)?;
    bars.reverse();

    Ok(Json(bars))
}
