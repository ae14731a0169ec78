//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use farmconnect_core::clock::Clock;
use farmconnect_store::PgStore;
use farmconnect_test_support::FixedClock;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use farmconnect_api::build_router;
use farmconnect_api::extract::ACCOUNT_HEADER;
use farmconnect_api::state::AppState;

/// Build the full app router over a real `PgStore` and a fixed clock.
pub fn build_test_app(pool: PgPool) -> Router {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::standard());
    build_router(AppState::new(Arc::new(PgStore::new(pool)), clock))
}

/// Send a request, optionally as `caller`, and return the status and JSON body.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    caller: Option<Uuid>,
    body: Option<&Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(account_id) = caller {
        builder = builder.header(ACCOUNT_HEADER, account_id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body.
pub async fn post_json(
    app: Router,
    uri: &str,
    caller: Option<Uuid>,
    body: &Value,
) -> (StatusCode, Value) {
    send(app, "POST", uri, caller, Some(body)).await
}

/// Send a GET request.
pub async fn get_json(app: Router, uri: &str, caller: Option<Uuid>) -> (StatusCode, Value) {
    send(app, "GET", uri, caller, None).await
}

/// Register an account through the API and return its ID.
pub async fn register(pool: &PgPool, username: &str, role: &str, phone: &str) -> Uuid {
    let (status, json) = post_json(
        build_test_app(pool.clone()),
        "/api/v1/accounts",
        None,
        &serde_json::json!({ "username": username, "role": role, "phone": phone }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {username}: {json}");
    Uuid::parse_str(json["id"].as_str().unwrap()).unwrap()
}

/// List a product through the API and return its ID.
pub async fn list_product(pool: &PgPool, seller: Uuid, name: &str, price: &str) -> Uuid {
    let (status, json) = post_json(
        build_test_app(pool.clone()),
        "/api/v1/products",
        Some(seller),
        &serde_json::json!({ "name": name, "category": "vegetables", "price": price }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "list {name}: {json}");
    Uuid::parse_str(json["id"].as_str().unwrap()).unwrap()
}
