//! Route modules organized by bounded context.

pub mod accounts;
pub mod cart;
pub mod coupons;
pub mod health;
pub mod orders;
pub mod products;
pub mod ratings;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use farmconnect_core::clock::Clock;
    use farmconnect_core::records::Account;
    use farmconnect_test_support::{FailingStore, FixedClock, InMemoryStore};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::extract::ACCOUNT_HEADER;
    use crate::state::AppState;

    pub(crate) fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::standard())
    }

    /// A store seeded with `accounts`, plus the state serving it.
    pub(crate) fn seeded_state(accounts: &[&Account]) -> (Arc<InMemoryStore>, AppState) {
        let store = Arc::new(InMemoryStore::new());
        for account in accounts {
            store.seed_account(account);
        }
        let state = AppState::new(store.clone(), clock());
        (store, state)
    }

    pub(crate) fn failing_state() -> AppState {
        AppState::new(Arc::new(FailingStore), clock())
    }

    /// Sends a request as `caller` and returns the status and JSON body.
    pub(crate) async fn send(
        app: Router,
        method: &str,
        uri: &str,
        caller: Option<&Account>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(account) = caller {
            builder = builder.header(ACCOUNT_HEADER, account.id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }
}
