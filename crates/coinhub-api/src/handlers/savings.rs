//! Savings: rate plan catalog (admin CRUD) and contract registration.

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::state::ApiState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use coinhub_core::{AccountId, Money, PlanId, RatePlan, Saving, SavingId, SavingStatus};
use coinhub_ledger::LedgerError;
use coinhub_store::{Page, PageQuery, SavingFilter};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

/// `GET /v1/rate-plans`: offered plans.
pub async fn list_plans(
    State(state): State<ApiState>,
    Query(page): Query<PageQuery>,
) -> Json<Page<RatePlan>> {
    Json(state.store.plans_page(&page))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub term_months: u32,
    pub annual_rate: Decimal,
    pub min_amount: Money,
}

impl CreatePlanRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(validation("name must not be empty"));
        }
        if self.term_months == 0 {
            return Err(validation("term_months must be positive"));
        }
        if self.annual_rate.is_sign_negative() {
            return Err(validation("annual_rate must not be negative"));
        }
        if !self.min_amount.is_positive() {
            return Err(validation("min_amount must be positive"));
        }
        Ok(())
    }
}

fn validation(msg: &str) -> ApiError {
    ApiError::Ledger(LedgerError::Validation(msg.to_string()))
}

/// `POST /v1/admin/rate-plans`
pub async fn admin_create_plan(
    identity: Identity,
    State(state): State<ApiState>,
    Json(body): Json<CreatePlanRequest>,
) -> ApiResult<(StatusCode, Json<RatePlan>)> {
    identity.require_admin()?;
    body.validate()?;

    let plan = state.store.insert_plan(RatePlan::new(
        &body.name,
        body.term_months,
        body.annual_rate,
        body.min_amount,
    ));
    Ok((StatusCode::CREATED, Json(plan)))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub term_months: Option<u32>,
    #[serde(default)]
    pub annual_rate: Option<Decimal>,
    #[serde(default)]
    pub min_amount: Option<Money>,
}

/// `PATCH /v1/admin/rate-plans/{id}`
pub async fn admin_update_plan(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePlanRequest>,
) -> ApiResult<Json<RatePlan>> {
    identity.require_admin()?;

    let mut plan = state.store.plan(PlanId(id))?;
    if let Some(name) = body.name {
        plan.name = name.trim().to_string();
    }
    if let Some(term_months) = body.term_months {
        if term_months == 0 {
            return Err(validation("term_months must be positive"));
        }
        plan.term_months = term_months;
    }
    if let Some(annual_rate) = body.annual_rate {
        plan.annual_rate = annual_rate;
    }
    if let Some(min_amount) = body.min_amount {
        plan.min_amount = min_amount;
    }
    plan.updated_at = Utc::now();

    Ok(Json(state.store.replace_plan(plan)?))
}

/// `DELETE /v1/admin/rate-plans/{id}`
pub async fn admin_delete_plan(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    identity.require_admin()?;
    state.store.delete_plan(PlanId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct RegisterSavingRequest {
    pub plan_id: Uuid,
    pub amount: Money,
}

/// `POST /v1/savings`: register a savings contract.
pub async fn register(
    identity: Identity,
    State(state): State<ApiState>,
    Json(body): Json<RegisterSavingRequest>,
) -> ApiResult<(StatusCode, Json<Saving>)> {
    let saving = state
        .savings
        .register(identity.account_id, PlanId(body.plan_id), body.amount)?;
    Ok((StatusCode::CREATED, Json(saving)))
}

#[derive(Debug, Deserialize)]
pub struct SavingsQuery {
    #[serde(default)]
    pub status: Option<SavingStatus>,
    /// Admin only: list another account's savings.
    #[serde(default)]
    pub account_id: Option<Uuid>,
    #[serde(flatten)]
    pub page: PageQuery,
}

/// `GET /v1/savings`: own savings; admins see all accounts.
pub async fn list(
    identity: Identity,
    State(state): State<ApiState>,
    Query(query): Query<SavingsQuery>,
) -> ApiResult<Json<Page<Saving>>> {
    let account_id = if identity.is_admin() {
        query.account_id.map(AccountId)
    } else {
        Some(identity.account_id)
    };

    let filter = SavingFilter {
        account_id,
        status: query.status,
    };
    Ok(Json(state.store.savings_page(&filter, &query.page)))
}

/// `GET /v1/savings/{id}`: owner or admin.
pub async fn get(
    identity: Identity,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Saving>> {
    let saving = state.store.saving(SavingId(id))?;
    identity.require_owner_or_admin(saving.account_id)?;
    Ok(Json(saving))
}
