//! Caller identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use farmconnect_core::records::Account;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's account ID.
pub const ACCOUNT_HEADER: &str = "x-account-id";

/// The account making the request, resolved from the `X-Account-Id` header.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(ACCOUNT_HEADER) else {
            return Err(ApiError::Unauthenticated(
                "missing X-Account-Id header".to_owned(),
            ));
        };
        let account_id = raw
            .to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or_else(|| {
                warn!("malformed X-Account-Id header");
                ApiError::Unauthenticated("malformed X-Account-Id header".to_owned())
            })?;

        match state.accounts.find_account(account_id).await? {
            Some(account) => Ok(Self(account)),
            None => {
                warn!(account_id = %account_id, "request from unknown account");
                Err(ApiError::Unauthenticated(format!(
                    "unknown account {account_id}"
                )))
            }
        }
    }
}
