//! Linked bank account management (one per account, owner only).

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::state::ApiState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use coinhub_core::{BankDetails, BankLink};
use coinhub_ledger::LedgerError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LinkBankRequest {
    pub bank_name: String,
    pub bank_number: String,
    pub holder_name: String,
}

impl LinkBankRequest {
    fn validate(&self) -> Result<(), ApiError> {
        for (field, value) in [
            ("bank_name", &self.bank_name),
            ("bank_number", &self.bank_number),
            ("holder_name", &self.holder_name),
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

/// `POST /v1/bank-account`: link a bank account.
pub async fn create(
    identity: Identity,
    State(state): State<ApiState>,
    Json(body): Json<LinkBankRequest>,
) -> ApiResult<(StatusCode, Json<BankLink>)> {
    body.validate()?;

    let link = state.store.insert_bank_link(BankLink::new(
        identity.account_id,
        BankDetails {
            bank_name: body.bank_name.trim().to_string(),
            bank_number: body.bank_number.trim().to_string(),
            holder_name: body.holder_name.trim().to_string(),
        },
    ))?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// `GET /v1/bank-account`: the caller's link.
pub async fn get(identity: Identity, State(state): State<ApiState>) -> ApiResult<Json<BankLink>> {
    state
        .store
        .bank_link_by_account(identity.account_id)
        .map(Json)
        .ok_or(ApiError::Ledger(LedgerError::NotFound("bank link")))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBankRequest {
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bank_number: Option<String>,
    #[serde(default)]
    pub holder_name: Option<String>,
}

/// `PATCH /v1/bank-account`: edit the caller's link.
pub async fn update(
    identity: Identity,
    State(state): State<ApiState>,
    Json(body): Json<UpdateBankRequest>,
) -> ApiResult<Json<BankLink>> {
    let mut link = state
        .store
        .bank_link_by_account(identity.account_id)
        .ok_or(ApiError::Ledger(LedgerError::NotFound("bank link")))?;

    if let Some(bank_name) = body.bank_name {
        link.details.bank_name = bank_name.trim().to_string();
    }
    if let Some(bank_number) = body.bank_number {
        link.details.bank_number = bank_number.trim().to_string();
    }
    if let Some(holder_name) = body.holder_name {
        link.details.holder_name = holder_name.trim().to_string();
    }
    link.updated_at = Utc::now();

    Ok(Json(state.store.replace_bank_link(link)?))
}

/// `DELETE /v1/bank-account`: unlink.
pub async fn delete(identity: Identity, State(state): State<ApiState>) -> ApiResult<StatusCode> {
    let link = state
        .store
        .bank_link_by_account(identity.account_id)
        .ok_or(ApiError::Ledger(LedgerError::NotFound("bank link")))?;
    state.store.delete_bank_link(link.id)?;
    Ok(StatusCode::NO_CONTENT)
}
