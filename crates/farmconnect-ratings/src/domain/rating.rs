//! Rating intake rules.

use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AccountRole, Order, Rating};
use uuid::Uuid;

use super::commands::RecordRating;

/// Lowest accepted star value.
pub const MIN_STARS: i32 = 1;
/// Highest accepted star value.
pub const MAX_STARS: i32 = 5;

/// Checks that `stars` lies in `[1, 5]`.
///
/// # Errors
///
/// Returns `DomainError::Validation` otherwise.
pub fn validate_stars(stars: i32) -> Result<(), DomainError> {
    if (MIN_STARS..=MAX_STARS).contains(&stars) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "stars must be between {MIN_STARS} and {MAX_STARS}, got {stars}"
        )))
    }
}

/// Builds the rating `buyer` gives through `order`. The seller is taken from
/// the order.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` when `buyer` is not a buyer or did not
/// place `order`, and `DomainError::Validation` for an out-of-range star value
/// or a product the order does not contain.
pub fn new_rating(
    buyer: &Account,
    order: &Order,
    command: &RecordRating,
    now: DateTime<Utc>,
) -> Result<Rating, DomainError> {
    buyer.ensure_role(AccountRole::Buyer)?;
    validate_stars(command.stars)?;
    if order.buyer_id != buyer.id {
        return Err(DomainError::Forbidden(format!(
            "order {} was not placed by account {}",
            order.id, buyer.id
        )));
    }
    if !order
        .items
        .iter()
        .any(|item| item.product_id == Some(command.product_id))
    {
        return Err(DomainError::Validation(format!(
            "order {} does not contain product {}",
            order.id, command.product_id
        )));
    }

    Ok(Rating {
        id: Uuid::new_v4(),
        buyer_id: buyer.id,
        seller_id: order.seller_id,
        product_id: command.product_id,
        order_id: order.id,
        stars: command.stars,
        feedback: command
            .feedback
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned(),
        created_at: now,
    })
}
