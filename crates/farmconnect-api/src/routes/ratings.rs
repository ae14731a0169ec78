//! Routes for the Ratings bounded context.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use farmconnect_ratings::application::command_handlers::{self, RatingRecorded};
use farmconnect_ratings::domain::commands;

use crate::error::ApiError;
use crate::extract::CurrentAccount;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct RecordRatingRequest {
    /// Order the product was bought through.
    pub order_id: Uuid,
    /// Rated product.
    pub product_id: Uuid,
    /// Star value.
    pub stars: i32,
    /// Optional free text.
    #[serde(default)]
    pub feedback: Option<String>,
}

/// POST /
#[instrument(skip(state, buyer, request), fields(buyer_id = %buyer.id, product_id = %request.product_id))]
async fn record_rating(
    State(state): State<AppState>,
    CurrentAccount(buyer): CurrentAccount,
    Json(request): Json<RecordRatingRequest>,
) -> Result<(StatusCode, Json<RatingRecorded>), ApiError> {
    let command = commands::RecordRating {
        correlation_id: Uuid::new_v4(),
        order_id: request.order_id,
        product_id: request.product_id,
        stars: request.stars,
        feedback: request.feedback,
    };

    info!(correlation_id = %command.correlation_id, "handling record_rating command");

    let recorded = command_handlers::handle_record_rating(
        &command,
        &buyer,
        state.clock.as_ref(),
        &*state.orders,
        &*state.ratings,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(recorded)))
}

/// Returns the router for the ratings context.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(record_rating))
}
