//! Routes for the Cart bounded context. Every route acts on the caller's own
//! cart and responds with the cart as it is afterwards.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post, routing::put};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use farmconnect_cart::application::query_handlers::{self, CartView};
use farmconnect_cart::application::command_handlers;
use farmconnect_cart::domain::commands;

use crate::error::ApiError;
use crate::extract::CurrentAccount;
use crate::state::AppState;

fn default_quantity() -> i32 {
    1
}

/// Request body for POST /items.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Product to add.
    pub product_id: Uuid,
    /// Quantity to add; defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Request body for PUT /items/{item_id}.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// New quantity; zero or less removes the item.
    pub quantity: i32,
}

/// GET /
#[instrument(skip(state, buyer), fields(buyer_id = %buyer.id))]
async fn get_cart(
    State(state): State<AppState>,
    CurrentAccount(buyer): CurrentAccount,
) -> Result<Json<CartView>, ApiError> {
    let view = query_handlers::get_cart(&buyer, state.clock.as_ref(), &*state.carts).await?;
    Ok(Json(view))
}

/// POST /items
#[instrument(skip(state, buyer, request), fields(buyer_id = %buyer.id, product_id = %request.product_id))]
async fn add_item(
    State(state): State<AppState>,
    CurrentAccount(buyer): CurrentAccount,
    Json(request): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartView>), ApiError> {
    let command = commands::AddCartItem {
        correlation_id: Uuid::new_v4(),
        product_id: request.product_id,
        quantity: request.quantity,
    };

    info!(correlation_id = %command.correlation_id, "handling add_cart_item command");

    let cart = command_handlers::handle_add_item(
        &command,
        &buyer,
        state.clock.as_ref(),
        &*state.carts,
        &*state.products,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CartView::from(&cart))))
}

/// PUT /items/{item_id}
#[instrument(skip(state, buyer, request), fields(buyer_id = %buyer.id, quantity = request.quantity))]
async fn update_item(
    State(state): State<AppState>,
    CurrentAccount(buyer): CurrentAccount,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<CartView>, ApiError> {
    let command = commands::UpdateCartItem {
        correlation_id: Uuid::new_v4(),
        item_id,
        quantity: request.quantity,
    };

    info!(correlation_id = %command.correlation_id, "handling update_cart_item command");

    let cart =
        command_handlers::handle_update_item(&command, &buyer, state.clock.as_ref(), &*state.carts)
            .await?;

    Ok(Json(CartView::from(&cart)))
}

/// DELETE /items/{item_id}
#[instrument(skip(state, buyer), fields(buyer_id = %buyer.id))]
async fn remove_item(
    State(state): State<AppState>,
    CurrentAccount(buyer): CurrentAccount,
    Path(item_id): Path<Uuid>,
) -> Result<Json<CartView>, ApiError> {
    let command = commands::RemoveCartItem {
        correlation_id: Uuid::new_v4(),
        item_id,
    };

    info!(correlation_id = %command.correlation_id, "handling remove_cart_item command");

    let cart =
        command_handlers::handle_remove_item(&command, &buyer, state.clock.as_ref(), &*state.carts)
            .await?;

    Ok(Json(CartView::from(&cart)))
}

/// DELETE /
#[instrument(skip(state, buyer), fields(buyer_id = %buyer.id))]
async fn clear_cart(
    State(state): State<AppState>,
    CurrentAccount(buyer): CurrentAccount,
) -> Result<Json<CartView>, ApiError> {
    let command = commands::ClearCart {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling clear_cart command");

    let cart =
        command_handlers::handle_clear_cart(&command, &buyer, state.clock.as_ref(), &*state.carts)
            .await?;

    Ok(Json(CartView::from(&cart)))
}

/// Returns the router for the cart context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/{item_id}", put(update_item).delete(remove_item))
}
