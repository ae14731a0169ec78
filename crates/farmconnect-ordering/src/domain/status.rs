//! Order lifecycle.
//!
//! ```text
//! pending ──► accepted ──► delivered
//!    │            │
//!    └──► cancelled ◄──┘
//! ```

use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, Order, OrderStatus};

/// Whether the lifecycle has an edge from `from` to `to`.
#[must_use]
pub fn is_legal_transition(from: OrderStatus, to: OrderStatus) -> bool {
    matches!(
        (from, to),
        (OrderStatus::Pending, OrderStatus::Accepted | OrderStatus::Cancelled)
            | (OrderStatus::Accepted, OrderStatus::Delivered | OrderStatus::Cancelled)
    )
}

/// Fails unless `actor` is the buyer or the seller of `order`.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for any other account.
pub fn ensure_party(actor: &Account, order: &Order) -> Result<(), DomainError> {
    if actor.id == order.buyer_id || actor.id == order.seller_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "account {} is not a party to order {}",
            actor.id, order.id
        )))
    }
}

/// Checks that `actor` may move `order` to `target`.
///
/// The seller may take any legal step. The buyer may only cancel a pending
/// order.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` when `actor` is not a party or not allowed
/// to take the step, and `DomainError::Validation` for an illegal step.
pub fn ensure_transition(
    actor: &Account,
    order: &Order,
    target: OrderStatus,
) -> Result<(), DomainError> {
    ensure_party(actor, order)?;
    if !is_legal_transition(order.status, target) {
        return Err(DomainError::Validation(format!(
            "order {} cannot move from {} to {target}",
            order.id, order.status
        )));
    }
    if actor.id == order.seller_id {
        return Ok(());
    }
    if order.status == OrderStatus::Pending && target == OrderStatus::Cancelled {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "buyers may only cancel pending orders, not move them to {target}"
        )))
    }
}
