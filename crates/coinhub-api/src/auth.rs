//! Identity extraction.
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity in `x-account-id` and `x-role` headers and this layer trusts
//! them completely. Handlers use [`Identity`] for ownership checks and
//! [`Identity::require_admin`] for admin-only routes.

use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use coinhub_core::{AccountId, Role};
use uuid::Uuid;

const ACCOUNT_HEADER: &str = "x-account-id";
const ROLE_HEADER: &str = "x-role";

/// The authenticated caller, as asserted by the gateway.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub account_id: AccountId,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Admin-only guard.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    /// Ownership guard: the caller must own the resource or be an admin.
    pub fn require_owner_or_admin(&self, owner: AccountId) -> Result<(), ApiError> {
        if self.account_id == owner || self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account_id = parts
            .headers
            .get(ACCOUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .map(AccountId)
            .ok_or(ApiError::Unauthenticated)?;

        let role = match parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("admin") => Role::Admin,
            Some("user") => Role::User,
            _ => return Err(ApiError::Unauthenticated),
        };

        Ok(Self { account_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            account_id: AccountId::new(),
            role,
        }
    }

    #[test]
    fn test_admin_guard() {
        assert!(identity(Role::Admin).require_admin().is_ok());
        assert!(matches!(
            identity(Role::User).require_admin(),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn test_ownership_guard() {
        let caller = identity(Role::User);
        assert!(caller.require_owner_or_admin(caller.account_id).is_ok());
        assert!(matches!(
            caller.require_owner_or_admin(AccountId::new()),
            Err(ApiError::Forbidden)
        ));

        // Admins may act on any account.
        let admin = identity(Role::Admin);
        assert!(admin.require_owner_or_admin(AccountId::new()).is_ok());
    }
}
