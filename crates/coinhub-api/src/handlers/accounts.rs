//! Account signup and admin listing.

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::state::ApiState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use coinhub_core::{Account, BankLink, Role};
use coinhub_ledger::LedgerError;
use coinhub_store::{AccountFilter, Page, PageQuery};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub display_name: String,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::Ledger(LedgerError::Validation(
                "email must be a valid address".to_string(),
            )));
        }
        if self.display_name.trim().is_empty() {
            return Err(ApiError::Ledger(LedgerError::Validation(
                "display_name must not be empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// `POST /v1/accounts`: signup. Accounts start with a zero balance and
/// the `user` role; roles are managed out of band.
pub async fn signup(
    State(state): State<ApiState>,
    Json(body): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    body.validate()?;

    let account = state
        .store
        .insert_account(Account::new(&body.email, &body.display_name, Role::User))?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// `GET /v1/me`: the caller's account.
pub async fn me(identity: Identity, State(state): State<ApiState>) -> ApiResult<Json<Account>> {
    Ok(Json(state.store.account(identity.account_id)?))
}

/// Account with its bank link attached, for the admin listing.
#[derive(Debug, Serialize)]
pub struct AccountWithBank {
    #[serde(flatten)]
    pub account: Account,
    pub bank_link: Option<BankLink>,
}

#[derive(Debug, Deserialize)]
pub struct AccountsQuery {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(flatten)]
    pub page: PageQuery,
}

/// `GET /v1/accounts`: admin listing with bank links attached.
pub async fn admin_list(
    identity: Identity,
    State(state): State<ApiState>,
    Query(query): Query<AccountsQuery>,
) -> ApiResult<Json<Page<AccountWithBank>>> {
    identity.require_admin()?;

    let filter = AccountFilter { role: query.role };
    let page = state.store.accounts_page(&filter, &query.page);

    let results = page
        .results
        .into_iter()
        .map(|account| {
            let bank_link = state.store.bank_link_by_account(account.id);
            AccountWithBank { account, bank_link }
        })
        .collect();

    Ok(Json(Page {
        results,
        page: page.page,
        limit: page.limit,
        total_pages: page.total_pages,
        total_results: page.total_results,
    }))
}
