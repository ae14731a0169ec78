//! Farm Connect marketplace HTTP API.
//!
//! The binary in `main.rs` wires configuration, telemetry and the PostgreSQL
//! store into [`build_router`]; tests build the same router over an
//! in-memory store.

use axum::Router;

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod telemetry;

use state::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/accounts", routes::accounts::router())
        .nest("/api/v1/products", routes::products::router())
        .nest("/api/v1/cart", routes::cart::router())
        .nest("/api/v1/orders", routes::orders::router())
        .nest("/api/v1/ratings", routes::ratings::router())
        .nest("/api/v1/coupons", routes::coupons::router())
        .with_state(state)
}
