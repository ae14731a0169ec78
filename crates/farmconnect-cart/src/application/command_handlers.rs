//! Command handlers for the Cart context.
//!
//! Every handler resolves the buyer's cart, applies one mutation and returns
//! the cart as it is after the mutation.

use farmconnect_core::clock::Clock;
use farmconnect_core::command::Command;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AccountRole, Cart};
use farmconnect_core::repository::{CartRepository, ProductRepository};
use tracing::info;

use crate::domain::cart::{self, QuantityChange};
use crate::domain::commands::{AddCartItem, ClearCart, RemoveCartItem, UpdateCartItem};

async fn buyer_cart(
    buyer: &Account,
    clock: &dyn Clock,
    repo: &dyn CartRepository,
) -> Result<Cart, DomainError> {
    buyer.ensure_role(AccountRole::Buyer)?;
    repo.ensure_cart(buyer.id, clock.now()).await
}

async fn reload(buyer: &Account, repo: &dyn CartRepository) -> Result<Cart, DomainError> {
    repo.find_cart(buyer.id)
        .await?
        .ok_or_else(|| DomainError::not_found("cart", buyer.id))
}

/// Handles the `AddCartItem` command. Adding a product already in the cart
/// increments its quantity.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-buyers, `DomainError::Validation`
/// for a quantity below 1 or a line that would exceed its maximum,
/// `DomainError::NotFound` for an unknown product, or the repository error.
pub async fn handle_add_item(
    command: &AddCartItem,
    buyer: &Account,
    clock: &dyn Clock,
    carts: &dyn CartRepository,
    products: &dyn ProductRepository,
) -> Result<Cart, DomainError> {
    cart::validate_add_quantity(command.quantity)?;
    let current = buyer_cart(buyer, clock, carts).await?;
    if products.find_product(command.product_id).await?.is_none() {
        return Err(DomainError::not_found("product", command.product_id));
    }
    cart::quantity_after_add(&current, command.product_id, command.quantity)?;
    carts
        .add_item(current.id, command.product_id, command.quantity, clock.now())
        .await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        cart_id = %current.id,
        product_id = %command.product_id,
        quantity = command.quantity,
        "item added to cart"
    );
    reload(buyer, carts).await
}

/// Handles the `UpdateCartItem` command. A quantity of zero or less removes
/// the item.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-buyers, `DomainError::NotFound` if
/// the item is not in the buyer's cart, `DomainError::Validation` above the
/// line maximum, or the repository error.
pub async fn handle_update_item(
    command: &UpdateCartItem,
    buyer: &Account,
    clock: &dyn Clock,
    repo: &dyn CartRepository,
) -> Result<Cart, DomainError> {
    let current = buyer_cart(buyer, clock, repo).await?;
    cart::find_item(&current, command.item_id)?;

    let change = QuantityChange::from_requested(command.quantity);
    match change {
        QuantityChange::Set(quantity) => {
            cart::validate_line_quantity(quantity)?;
            repo.set_item_quantity(current.id, command.item_id, quantity, clock.now())
                .await?;
        }
        QuantityChange::Remove => {
            repo.remove_item(current.id, command.item_id, clock.now())
                .await?;
        }
    }

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        cart_id = %current.id,
        item_id = %command.item_id,
        change = ?change,
        "cart item updated"
    );
    reload(buyer, repo).await
}

/// Handles the `RemoveCartItem` command.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-buyers, `DomainError::NotFound` if
/// the item is not in the buyer's cart, or the repository error.
pub async fn handle_remove_item(
    command: &RemoveCartItem,
    buyer: &Account,
    clock: &dyn Clock,
    repo: &dyn CartRepository,
) -> Result<Cart, DomainError> {
    let current = buyer_cart(buyer, clock, repo).await?;
    cart::find_item(&current, command.item_id)?;
    repo.remove_item(current.id, command.item_id, clock.now())
        .await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        cart_id = %current.id,
        item_id = %command.item_id,
        "cart item removed"
    );
    reload(buyer, repo).await
}

/// Handles the `ClearCart` command. The cart itself is kept.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-buyers or the repository error.
pub async fn handle_clear_cart(
    command: &ClearCart,
    buyer: &Account,
    clock: &dyn Clock,
    repo: &dyn CartRepository,
) -> Result<Cart, DomainError> {
    let current = buyer_cart(buyer, clock, repo).await?;
    repo.clear_cart(current.id, clock.now()).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        cart_id = %current.id,
        removed = current.items.len(),
        "cart cleared"
    );
    reload(buyer, repo).await
}
