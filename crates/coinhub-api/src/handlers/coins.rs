//! Coin listings: public catalog and admin CRUD.

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::state::ApiState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use coinhub_core::{CoinId, CoinSymbol, ListedCoin};
use coinhub_ledger::LedgerError;
use coinhub_store::{CoinFilter, Page, PageQuery};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a listing. The upstream `feed_symbol` is operator-facing
/// and deliberately absent.
#[derive(Debug, Serialize)]
pub struct PublicCoin {
    pub id: CoinId,
    pub symbol: CoinSymbol,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
}

impl From<ListedCoin> for PublicCoin {
    fn from(coin: ListedCoin) -> Self {
        Self {
            id: coin.id,
            symbol: coin.symbol,
            name: coin.name,
            description: coin.description,
            icon_url: coin.icon_url,
        }
    }
}

/// `GET /v1/coins`: active listings, public shape.
pub async fn list_active(State(state): State<ApiState>) -> Json<Vec<PublicCoin>> {
    let coins = state
        .store
        .active_coins()
        .into_iter()
        .map(PublicCoin::from)
        .collect();
    Json(coins)
}

#[derive(Debug, Deserialize)]
pub struct AdminCoinsQuery {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "super::de_opt_bool")]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub page: PageQuery,
}

/// `GET /v1/admin/coins`: full listings with pagination.
pub async fn admin_list(
    identity: Identity,
    State(state): State<ApiState>,
    Query(query): Query<AdminCoinsQuery>,
) -> ApiResult<Json<Page<ListedCoin>>> {
    identity.require_admin()?;

    let filter = CoinFilter {
        symbol: query.symbol.as_deref().map(CoinSymbol::new),
        is_active: query.is_active,
    };
    Ok(Json(state.store.coins_page(&filter, &query.page)))
}

#[derive(Debug, Deserialize)]
pub struct CreateCoinRequest {
    pub symbol: String,
    pub feed_symbol: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

impl CreateCoinRequest {
    fn validate(&self) -> Result<(), ApiError> {
        for (field, value) in [
            ("symbol", &self.symbol),
            ("feed_symbol", &self.feed_symbol),
            ("name", &self.name),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::Ledger(LedgerError::Validation(format!(
                    "{field} must not be empty"
                ))));
            }
        }
        Ok(())
    }
}

/// `POST /v1/admin/coins`: list a new coin.
pub async fn admin_create(
    identity: Identity,
    State(state): State<ApiState>,
    Json(body): Json<CreateCoinRequest>,
) -> ApiResult<(StatusCode, Json<ListedCoin>)> {
    identity.require_admin()?;
    body.validate()?;

    let mut coin = ListedCoin::new(CoinSymbol::new(&body.symbol), &body.feed_symbol, &body.name);
    coin.description = body.description;
    coin.icon_url = body.icon_url;

    let created = state.store.insert_coin(coin)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /v1/admin/coins/{id}`
pub async fn admin_get(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ListedCoin>> {
    identity.require_admin()?;
    Ok(Json(state.store.coin(CoinId(id))?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCoinRequest {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub feed_symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// `PATCH /v1/admin/coins/{id}`
pub async fn admin_update(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCoinRequest>,
) -> ApiResult<Json<ListedCoin>> {
    identity.require_admin()?;

    let mut coin = state.store.coin(CoinId(id))?;

    if let Some(symbol) = body.symbol {
        let symbol = CoinSymbol::new(&symbol);
        if state.store.coin_symbol_taken(&symbol, Some(coin.id)) {
            return Err(ApiError::Ledger(LedgerError::Duplicate("symbol")));
        }
        coin.symbol = symbol;
    }
    if let Some(feed_symbol) = body.feed_symbol {
        coin.feed_symbol = feed_symbol.trim().to_ascii_uppercase();
    }
    if let Some(name) = body.name {
        coin.name = name.trim().to_string();
    }
    if body.description.is_some() {
        coin.description = body.description;
    }
    if body.icon_url.is_some() {
        coin.icon_url = body.icon_url;
    }
    if let Some(is_active) = body.is_active {
        coin.is_active = is_active;
    }
    coin.updated_at = Utc::now();

    Ok(Json(state.store.replace_coin(coin)?))
}

/// `DELETE /v1/admin/coins/{id}`
pub async fn admin_delete(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    identity.require_admin()?;
    state.store.delete_coin(CoinId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
