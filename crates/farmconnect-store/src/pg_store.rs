//! `PostgreSQL` implementation of the marketplace repositories.

use farmconnect_core::error::DomainError;
use farmconnect_core::records::MAX_LINE_QUANTITY;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::error;

use crate::schema;

/// PostgreSQL-backed marketplace store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub(crate) async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool.begin().await.map_err(db_error)
    }
}

/// Maps a database error onto the domain.
///
/// Unique, foreign-key and check violations are caller mistakes and become
/// `Validation`; everything else is `Infrastructure`.
pub(crate) fn db_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let message = match db.constraint() {
                Some(schema::ACCOUNTS_USERNAME_KEY) => "username already registered".to_owned(),
                Some(schema::ACCOUNTS_PHONE_KEY) => "phone already registered".to_owned(),
                Some(schema::RATINGS_ORDER_ID_KEY) => "order has already been rated".to_owned(),
                Some(schema::COUPONS_CODE_KEY) => "coupon code already exists".to_owned(),
                Some(other) => format!("duplicate value violates {other}"),
                None => "duplicate value".to_owned(),
            };
            return DomainError::Validation(message);
        }
        if db.is_foreign_key_violation() {
            return DomainError::Validation(format!(
                "referenced record does not exist ({})",
                db.constraint().unwrap_or("foreign key")
            ));
        }
        if db.is_check_violation() {
            return DomainError::Validation(match db.constraint() {
                Some(schema::CART_ITEMS_QUANTITY_CHECK) => {
                    format!("a cart line holds at most {MAX_LINE_QUANTITY}")
                }
                other => format!("value rejected by {}", other.unwrap_or("check constraint")),
            });
        }
    }
    error!(error = %e, "database error");
    DomainError::Infrastructure(e.to_string())
}
