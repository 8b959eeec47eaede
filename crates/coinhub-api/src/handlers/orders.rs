//! Trading: order placement, order history, wallet view.

use crate::auth::Identity;
use crate::error::ApiResult;
use crate::state::ApiState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use coinhub_core::{AccountId, CoinOrder, CoinSymbol, OrderId, OrderSide, Quantity};
use coinhub_ledger::WalletView;
use coinhub_store::{OrderFilter, Page, PageQuery};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Quantity,
}

/// `POST /v1/orders`: execute a buy or sell at the current delayed price.
pub async fn create(
    identity: Identity,
    State(state): State<ApiState>,
    Json(body): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<CoinOrder>)> {
    let order = state
        .wallet
        .trade(
            identity.account_id,
            &CoinSymbol::new(&body.symbol),
            body.side,
            body.quantity,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub side: Option<OrderSide>,
    /// Admin only: list another account's orders.
    #[serde(default)]
    pub account_id: Option<Uuid>,
    #[serde(flatten)]
    pub page: PageQuery,
}

/// `GET /v1/orders`: own order history; admins may filter any account.
pub async fn list(
    identity: Identity,
    State(state): State<ApiState>,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<Json<Page<CoinOrder>>> {
    let account_id = if identity.is_admin() {
        query.account_id.map(AccountId)
    } else {
        Some(identity.account_id)
    };

    let filter = OrderFilter {
        account_id,
        symbol: query.symbol.as_deref().map(CoinSymbol::new),
        side: query.side,
    };
    Ok(Json(state.store.orders_page(&filter, &query.page)))
}

/// `GET /v1/orders/{id}`: owner or admin.
pub async fn get(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CoinOrder>> {
    let order = state.store.order(OrderId(id))?;
    identity.require_owner_or_admin(order.account_id)?;
    Ok(Json(order))
}

/// `GET /v1/wallet`: balance and holdings at current delayed prices.
pub async fn wallet(
    identity: Identity,
    State(state): State<ApiState>,
) -> ApiResult<Json<WalletView>> {
    Ok(Json(state.wallet.wallet_view(identity.account_id).await?))
}
