//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A record was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// The identifier (or code) that was looked up.
        id: String,
    },

    /// Checkout was attempted on a cart without items.
    #[error("cart is empty")]
    EmptyCart,

    /// A product referenced by a cart no longer exists.
    #[error("product {0} is no longer available")]
    ProductUnavailable(Uuid),

    /// A concurrent writer changed the record between read and commit.
    #[error("concurrency conflict on {entity} {id}")]
    ConcurrencyConflict {
        /// Kind of record that had the conflict.
        entity: &'static str,
        /// The record identifier.
        id: Uuid,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller is not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for [`DomainError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
