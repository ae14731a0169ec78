//! Routes for the Ordering bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use farmconnect_core::records::OrderStatus;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use farmconnect_ordering::application::query_handlers::{self, OrderView};
use farmconnect_ordering::application::command_handlers;
use farmconnect_ordering::domain::commands;

use crate::error::ApiError;
use crate::extract::CurrentAccount;
use crate::state::AppState;

/// Request body for POST /checkout. The body may be omitted entirely.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    /// Where the orders should be delivered.
    #[serde(default)]
    pub delivery_address: Option<String>,
}

/// Request body for POST /{id}/status.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Target status.
    pub status: OrderStatus,
}

/// POST /checkout
#[instrument(skip(state, buyer, request), fields(buyer_id = %buyer.id))]
async fn checkout(
    State(state): State<AppState>,
    CurrentAccount(buyer): CurrentAccount,
    request: Option<Json<CheckoutRequest>>,
) -> Result<(StatusCode, Json<Vec<OrderView>>), ApiError> {
    let Json(request) = request.unwrap_or_default();
    let command = commands::Checkout {
        correlation_id: Uuid::new_v4(),
        delivery_address: request.delivery_address,
    };

    info!(correlation_id = %command.correlation_id, "handling checkout command");

    let orders = command_handlers::handle_checkout(
        &command,
        &buyer,
        state.clock.as_ref(),
        &*state.carts,
        &*state.orders,
    )
    .await?;

    let views = orders.iter().map(OrderView::from).collect();
    Ok((StatusCode::CREATED, Json(views)))
}

/// GET /
#[instrument(skip(state, account), fields(account_id = %account.id, role = %account.role))]
async fn list_orders(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let orders = query_handlers::list_orders(&account, &*state.orders).await?;
    Ok(Json(orders))
}

/// GET /{id}
#[instrument(skip(state, account), fields(account_id = %account.id))]
async fn get_order(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderView>, ApiError> {
    let order = query_handlers::get_order(&account, order_id, &*state.orders).await?;
    Ok(Json(order))
}

/// POST /{id}/status
#[instrument(skip(state, actor, request), fields(actor_id = %actor.id, target = %request.status))]
async fn transition_order(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(order_id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<OrderView>, ApiError> {
    let command = commands::TransitionOrder {
        correlation_id: Uuid::new_v4(),
        order_id,
        target: request.status,
    };

    info!(correlation_id = %command.correlation_id, "handling transition_order command");

    let order =
        command_handlers::handle_transition_order(&command, &actor, &*state.orders).await?;

    Ok(Json(OrderView::from(&order)))
}

/// Returns the router for the ordering context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
        .route("/{id}/status", post(transition_order))
}
