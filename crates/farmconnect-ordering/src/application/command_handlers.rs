//! Command handlers for the Ordering context.

use farmconnect_core::clock::Clock;
use farmconnect_core::command::Command;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AccountRole, Order};
use farmconnect_core::repository::{CartRepository, OrderRepository};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::checkout;
use crate::domain::commands::{Checkout, TransitionOrder};
use crate::domain::status;

/// Handles the `Checkout` command: creates one order per seller from the
/// buyer's cart and empties the cart, all in one unit.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-buyers,
/// `DomainError::EmptyCart` when there is nothing to order,
/// `DomainError::ProductUnavailable` when a product has been deleted,
/// `DomainError::ConcurrencyConflict` when the cart or a price changed during
/// checkout, or the repository error. No order is stored on error.
pub async fn handle_checkout(
    command: &Checkout,
    buyer: &Account,
    clock: &dyn Clock,
    carts: &dyn CartRepository,
    orders: &dyn OrderRepository,
) -> Result<Vec<Order>, DomainError> {
    buyer.ensure_role(AccountRole::Buyer)?;
    let cart = carts
        .find_cart(buyer.id)
        .await?
        .ok_or(DomainError::EmptyCart)?;

    let address = command.delivery_address.as_deref().unwrap_or_default();
    let placement = checkout::plan_checkout(&cart, address, clock.now())?;
    if let Err(e) = orders.place_orders(&placement).await {
        warn!(
            command = command.command_type(),
            correlation_id = %command.correlation_id(),
            cart_id = %cart.id,
            error = %e,
            "checkout rejected at commit"
        );
        return Err(e);
    }

    let total: Decimal = placement.orders.iter().map(|o| o.total_amount).sum();
    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        cart_id = %cart.id,
        buyer_id = %buyer.id,
        orders = placement.orders.len(),
        total = %total,
        "checkout completed"
    );
    Ok(placement.orders)
}

/// Handles the `TransitionOrder` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown order,
/// `DomainError::Forbidden` when `actor` may not take the step,
/// `DomainError::Validation` for a step the lifecycle does not allow,
/// `DomainError::ConcurrencyConflict` when the status changed concurrently, or
/// the repository error.
pub async fn handle_transition_order(
    command: &TransitionOrder,
    actor: &Account,
    repo: &dyn OrderRepository,
) -> Result<Order, DomainError> {
    let mut order = repo
        .find_order(command.order_id)
        .await?
        .ok_or_else(|| DomainError::not_found("order", command.order_id))?;
    status::ensure_transition(actor, &order, command.target)?;
    repo.update_order_status(order.id, order.status, command.target)
        .await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        order_id = %order.id,
        from = %order.status,
        to = %command.target,
        actor_id = %actor.id,
        "order status changed"
    );
    order.status = command.target;
    Ok(order)
}
