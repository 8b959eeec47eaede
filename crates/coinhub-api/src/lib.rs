//! HTTP API surface for coinhub.
//!
//! Thin axum layer over the ledger: identity/role extraction from gateway
//! headers, request validation, and the stable error-to-status mapping.
//! All business rules live in `coinhub-ledger`; handlers only enforce
//! role and ownership.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::Identity;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::serve;
pub use state::ApiState;
