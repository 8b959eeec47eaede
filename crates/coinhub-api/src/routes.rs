//! Route table.

use crate::handlers::{accounts, bank, coins, market, orders, savings, transfers};
use crate::state::ApiState;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn create_router(state: ApiState) -> Router {
    let admin = Router::new()
        .route("/coins", get(coins::admin_list).post(coins::admin_create))
        .route(
            "/coins/{id}",
            get(coins::admin_get)
                .patch(coins::admin_update)
                .delete(coins::admin_delete),
        )
        .route("/rate-plans", post(savings::admin_create_plan))
        .route(
            "/rate-plans/{id}",
            patch(savings::admin_update_plan).delete(savings::admin_delete_plan),
        );

    let v1 = Router::new()
        .route("/market/klines", get(market::get_klines))
        .route("/coins", get(coins::list_active))
        .route("/accounts", post(accounts::signup).get(accounts::admin_list))
        .route("/me", get(accounts::me))
        .route("/orders", post(orders::create).get(orders::list))
        .route("/orders/{id}", get(orders::get))
        .route("/wallet", get(orders::wallet))
        .route("/transfers", post(transfers::create).get(transfers::list))
        .route("/transfers/{id}", get(transfers::get))
        .route("/transfers/{id}/approve", post(transfers::approve))
        .route("/transfers/{id}/reject", post(transfers::reject))
        .route(
            "/bank-account",
            post(bank::create)
                .get(bank::get)
                .patch(bank::update)
                .delete(bank::delete),
        )
        .route("/rate-plans", get(savings::list_plans))
        .route("/savings", post(savings::register).get(savings::list))
        .route("/savings/{id}", get(savings::get))
        .nest("/admin", admin);

    Router::new()
        .route("/health", get(health))
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
