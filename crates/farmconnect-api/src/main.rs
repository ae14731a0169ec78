//! Farm Connect API server entry point.

use std::sync::Arc;

use farmconnect_api::config::ApiConfig;
use farmconnect_api::error::AppError;
use farmconnect_api::state::AppState;
use farmconnect_api::{build_router, telemetry};
use farmconnect_core::clock::SystemClock;
use farmconnect_store::{PgStore, schema};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = ApiConfig::from_env()?;
    let _telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Farm Connect API server");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    schema::migrate(&pool).await?;

    let app_state = AppState::new(Arc::new(PgStore::new(pool)), Arc::new(SystemClock));

    // TODO: Replace CorsLayer::permissive() with the storefront origin once it is deployed.
    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.listen_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
