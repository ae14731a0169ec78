//! Routes for the Accounts bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use farmconnect_core::records::{Account, AccountRole, AdminVerification};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use farmconnect_accounts::application::{command_handlers, query_handlers};
use farmconnect_accounts::domain::commands;

use crate::error::ApiError;
use crate::extract::CurrentAccount;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct RegisterAccountRequest {
    /// Unique login name.
    pub username: String,
    /// Account role.
    pub role: AccountRole,
    /// Unique phone number.
    pub phone: String,
    /// Free-form location.
    #[serde(default)]
    pub location: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}

/// Request body for POST /{id}/verification.
#[derive(Debug, Deserialize)]
pub struct ReviewVerificationRequest {
    /// Whether the account is approved.
    pub approved: bool,
    /// Required when rejecting.
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// POST /
#[instrument(skip(state, request), fields(username = %request.username, role = %request.role))]
async fn register_account(
    State(state): State<AppState>,
    Json(request): Json<RegisterAccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let command = commands::RegisterAccount {
        correlation_id: Uuid::new_v4(),
        username: request.username,
        role: request.role,
        phone: request.phone,
        location: request.location,
        address: request.address,
    };

    info!(correlation_id = %command.correlation_id, "handling register_account command");

    let account = command_handlers::handle_register_account(
        &command,
        state.clock.as_ref(),
        &*state.accounts,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /{id}
#[instrument(skip(state, _caller))]
async fn get_account(
    State(state): State<AppState>,
    CurrentAccount(_caller): CurrentAccount,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Account>, ApiError> {
    let account = query_handlers::get_account(account_id, &*state.accounts).await?;
    Ok(Json(account))
}

/// POST /{id}/verification
#[instrument(skip(state, reviewer, request), fields(reviewer_id = %reviewer.id))]
async fn review_verification(
    State(state): State<AppState>,
    CurrentAccount(reviewer): CurrentAccount,
    Path(account_id): Path<Uuid>,
    Json(request): Json<ReviewVerificationRequest>,
) -> Result<Json<AdminVerification>, ApiError> {
    let command = commands::ReviewVerification {
        correlation_id: Uuid::new_v4(),
        account_id,
        approved: request.approved,
        rejection_reason: request.rejection_reason.unwrap_or_default(),
    };

    info!(correlation_id = %command.correlation_id, "handling review_verification command");

    let verification = command_handlers::handle_review_verification(
        &command,
        &reviewer,
        state.clock.as_ref(),
        &*state.accounts,
    )
    .await?;

    Ok(Json(verification))
}

/// Returns the router for the accounts context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_account))
        .route("/{id}", get(get_account))
        .route("/{id}/verification", post(review_verification))
}
