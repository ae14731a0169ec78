//! Routes for the Catalog bounded context: coupons.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use chrono::{DateTime, Utc};
use farmconnect_core::records::Coupon;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use farmconnect_catalog::application::query_handlers::CouponView;
use farmconnect_catalog::application::{command_handlers, query_handlers};
use farmconnect_catalog::domain::commands;

use crate::error::ApiError;
use crate::extract::CurrentAccount;
use crate::state::AppState;

fn default_active() -> bool {
    true
}

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    /// Redemption code.
    pub code: String,
    /// Start of validity.
    pub valid_from: DateTime<Utc>,
    /// End of validity.
    pub valid_to: DateTime<Utc>,
    /// Discount percentage.
    pub discount: i32,
    /// Manual on/off switch.
    #[serde(default = "default_active")]
    pub active: bool,
}

/// POST /
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id, code = %request.code))]
async fn create_coupon(
    State(state): State<AppState>,
    CurrentAccount(admin): CurrentAccount,
    Json(request): Json<CreateCouponRequest>,
) -> Result<(StatusCode, Json<Coupon>), ApiError> {
    let command = commands::CreateCoupon {
        correlation_id: Uuid::new_v4(),
        code: request.code,
        valid_from: request.valid_from,
        valid_to: request.valid_to,
        discount: request.discount,
        active: request.active,
    };

    info!(correlation_id = %command.correlation_id, "handling create_coupon command");

    let coupon = command_handlers::handle_create_coupon(&command, &admin, &*state.coupons).await?;

    Ok((StatusCode::CREATED, Json(coupon)))
}

/// GET /{code}
#[instrument(skip(state))]
async fn validate_coupon(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CouponView>, ApiError> {
    let view = query_handlers::validate_coupon(&code, state.clock.as_ref(), &*state.coupons).await?;
    Ok(Json(view))
}

/// Returns the router for coupons.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_coupon))
        .route("/{code}", get(validate_coupon))
}
