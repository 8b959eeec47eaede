//! Deposit/withdraw transfers and their review workflow.

use crate::auth::Identity;
use crate::error::ApiResult;
use crate::state::ApiState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use coinhub_core::{AccountId, Money, Transfer, TransferId, TransferKind, TransferStatus};
use coinhub_store::{Page, PageQuery, TransferFilter};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    #[serde(rename = "type")]
    pub kind: TransferKind,
    pub amount: Money,
}

/// `POST /v1/transfers`: file a deposit or withdraw request.
pub async fn create(
    identity: Identity,
    State(state): State<ApiState>,
    Json(body): Json<CreateTransferRequest>,
) -> ApiResult<(StatusCode, Json<Transfer>)> {
    let transfer = state
        .transfers
        .create(identity.account_id, body.kind, body.amount)?;
    Ok((StatusCode::CREATED, Json(transfer)))
}

#[derive(Debug, Deserialize)]
pub struct TransfersQuery {
    #[serde(rename = "type", default)]
    pub kind: Option<TransferKind>,
    #[serde(default)]
    pub status: Option<TransferStatus>,
    /// Admin only: list another account's transfers.
    #[serde(default)]
    pub account_id: Option<Uuid>,
    #[serde(flatten)]
    pub page: PageQuery,
}

/// `GET /v1/transfers`: own transfers; admins see all accounts.
pub async fn list(
    identity: Identity,
    State(state): State<ApiState>,
    Query(query): Query<TransfersQuery>,
) -> ApiResult<Json<Page<Transfer>>> {
    let account_id = if identity.is_admin() {
        query.account_id.map(AccountId)
    } else {
        Some(identity.account_id)
    };

    let filter = TransferFilter {
        account_id,
        kind: query.kind,
        status: query.status,
    };
    Ok(Json(state.store.transfers_page(&filter, &query.page)))
}

/// `GET /v1/transfers/{id}`: owner or admin.
pub async fn get(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Transfer>> {
    let transfer = state.store.transfer(TransferId(id))?;
    identity.require_owner_or_admin(transfer.account_id)?;
    Ok(Json(transfer))
}

/// `POST /v1/transfers/{id}/approve`: admin only.
pub async fn approve(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Transfer>> {
    identity.require_admin()?;
    let approved = state
        .transfers
        .approve(TransferId(id), identity.account_id)?;
    Ok(Json(approved))
}

/// `POST /v1/transfers/{id}/reject`: admin only.
pub async fn reject(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Transfer>> {
    identity.require_admin()?;
    let rejected = state
        .transfers
        .reject(TransferId(id), identity.account_id)?;
    Ok(Json(rejected))
}
