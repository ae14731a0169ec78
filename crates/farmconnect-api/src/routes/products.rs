//! Routes for the Catalog bounded context: products.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::put};
use farmconnect_core::records::{Category, Freshness, Product};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use farmconnect_catalog::application::query_handlers::CategoryView;
use farmconnect_catalog::application::{command_handlers, query_handlers};
use farmconnect_catalog::domain::commands;
use farmconnect_catalog::domain::product::ProductDraft;

use crate::error::ApiError;
use crate::extract::CurrentAccount;
use crate::state::AppState;

fn default_unit() -> String {
    "per kg".to_owned()
}

fn default_in_stock() -> bool {
    true
}

fn default_freshness() -> Freshness {
    Freshness::Fresh
}

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Category value, e.g. `vegetables`.
    pub category: Category,
    /// Unit price.
    pub price: Decimal,
    /// Pricing unit.
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Quantity on hand.
    #[serde(default)]
    pub available_quantity: f64,
    /// Stock flag.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Freshness grade.
    #[serde(default = "default_freshness")]
    pub freshness: Freshness,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// Request body for PUT /{id}/price.
#[derive(Debug, Deserialize)]
pub struct ChangePriceRequest {
    /// The new unit price.
    pub price: Decimal,
}

/// GET /categories
async fn list_categories() -> Json<Vec<CategoryView>> {
    Json(query_handlers::categories())
}

/// POST /
#[instrument(skip(state, seller, request), fields(seller_id = %seller.id, name = %request.name))]
async fn create_product(
    State(state): State<AppState>,
    CurrentAccount(seller): CurrentAccount,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let command = commands::CreateProduct {
        correlation_id: Uuid::new_v4(),
        draft: ProductDraft {
            name: request.name,
            description: request.description,
            category: request.category,
            price: request.price,
            unit: request.unit,
            available_quantity: request.available_quantity,
            in_stock: request.in_stock,
            freshness: request.freshness,
            image: request.image,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling create_product command");

    let product = command_handlers::handle_create_product(
        &command,
        &seller,
        state.clock.as_ref(),
        &*state.products,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /
#[instrument(skip(state))]
async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = query_handlers::list_products(&*state.products).await?;
    Ok(Json(products))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let product = query_handlers::get_product(product_id, &*state.products).await?;
    Ok(Json(product))
}

/// PUT /{id}/price
#[instrument(skip(state, seller, request), fields(seller_id = %seller.id, price = %request.price))]
async fn change_price(
    State(state): State<AppState>,
    CurrentAccount(seller): CurrentAccount,
    Path(product_id): Path<Uuid>,
    Json(request): Json<ChangePriceRequest>,
) -> Result<Json<Product>, ApiError> {
    let command = commands::ChangePrice {
        correlation_id: Uuid::new_v4(),
        product_id,
        price: request.price,
    };

    info!(correlation_id = %command.correlation_id, "handling change_price command");

    let product = command_handlers::handle_change_price(
        &command,
        &seller,
        state.clock.as_ref(),
        &*state.products,
    )
    .await?;

    Ok(Json(product))
}

/// Returns the router for products.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/categories", get(list_categories))
        .route("/{id}", get(get_product))
        .route("/{id}/price", put(change_price))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;
    use farmconnect_test_support::fixtures::{self, money};
    use serde_json::json;

    use crate::routes::test_support::{failing_state, seeded_state, send};

    #[tokio::test]
    async fn test_categories_lists_all_five() {
        // Arrange
        let (_, state) = seeded_state(&[]);
        let app = router().with_state(state);

        // Act
        let (status, json) = send(app, "GET", "/categories", None, None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let categories = json.as_array().unwrap();
        assert_eq!(categories.len(), 5);
        assert_eq!(categories[0], json!({ "value": "spices", "label": "Spices" }));
    }

    #[tokio::test]
    async fn test_seller_creates_product_with_defaults() {
        // Arrange
        let seller = fixtures::seller();
        let (store, state) = seeded_state(&[&seller]);
        let app = router().with_state(state);
        let body = json!({ "name": "Turmeric", "category": "spices", "price": "120.50" });

        // Act
        let (status, json) = send(app, "POST", "/", Some(&seller), Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["price"], "120.50");
        assert_eq!(json["unit"], "per kg");
        assert_eq!(json["freshness"], "Fresh");
        assert_eq!(json["rating"], "0.00");
        assert_eq!(json["total_ratings"], 0);
        assert_eq!(json["seller_id"], seller.id.to_string());
        let id = Uuid::parse_str(json["id"].as_str().unwrap()).unwrap();
        assert!(store.product(id).is_some());
    }

    #[tokio::test]
    async fn test_buyer_cannot_create_product() {
        // Arrange
        let buyer = fixtures::buyer();
        let (_, state) = seeded_state(&[&buyer]);
        let app = router().with_state(state);
        let body = json!({ "name": "Turmeric", "category": "spices", "price": "10.00" });

        // Act
        let (status, json) = send(app, "POST", "/", Some(&buyer), Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "forbidden");
    }

    #[tokio::test]
    async fn test_create_product_with_three_decimal_price_returns_400() {
        // Arrange
        let seller = fixtures::seller();
        let (_, state) = seeded_state(&[&seller]);
        let app = router().with_state(state);
        let body = json!({ "name": "Ghee", "category": "oils", "price": "10.005" });

        // Act
        let (status, json) = send(app, "POST", "/", Some(&seller), Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_get_product_returns_404_for_unknown_id() {
        // Arrange
        let (_, state) = seeded_state(&[]);
        let app = router().with_state(state);

        // Act
        let uri = format!("/{}", Uuid::new_v4());
        let (status, json) = send(app, "GET", &uri, None, None).await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_owner_changes_price_without_touching_rating() {
        // Arrange
        let seller = fixtures::seller();
        let (store, state) = seeded_state(&[&seller]);
        let mut product = fixtures::product(seller.id, money("40.00"));
        product.rating = money("4.50");
        product.total_ratings = 2;
        store.seed_product(&product);
        let app = router().with_state(state);

        // Act
        let uri = format!("/{}/price", product.id);
        let body = json!({ "price": "45.00" });
        let (status, json) = send(app, "PUT", &uri, Some(&seller), Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["price"], "45.00");
        let stored = store.product(product.id).unwrap();
        assert_eq!(stored.price, money("45.00"));
        assert_eq!(stored.rating, money("4.50"));
        assert_eq!(stored.total_ratings, 2);
    }

    #[tokio::test]
    async fn test_other_seller_cannot_change_price() {
        // Arrange
        let owner = fixtures::seller();
        let rival = fixtures::seller();
        let (store, state) = seeded_state(&[&owner, &rival]);
        let product = fixtures::product(owner.id, money("40.00"));
        store.seed_product(&product);
        let app = router().with_state(state);

        // Act
        let uri = format!("/{}/price", product.id);
        let body = json!({ "price": "1.00" });
        let (status, _) = send(app, "PUT", &uri, Some(&rival), Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(store.product(product.id).unwrap().price, money("40.00"));
    }

    #[tokio::test]
    async fn test_list_products_returns_500_when_store_fails() {
        // Arrange
        let app = router().with_state(failing_state());

        // Act
        let (status, json) = send(app, "GET", "/", None, None).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }
}
