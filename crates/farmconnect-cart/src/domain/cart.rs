//! Cart rules and totals.

use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Cart, CartItem, MAX_LINE_QUANTITY};
use rust_decimal::Decimal;
use uuid::Uuid;

/// What a requested quantity does to an existing cart item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Overwrite the quantity.
    Set(i32),
    /// Delete the item.
    Remove,
}

impl QuantityChange {
    /// Interprets a requested quantity; anything below 1 removes the item.
    #[must_use]
    pub fn from_requested(quantity: i32) -> Self {
        if quantity <= 0 {
            Self::Remove
        } else {
            Self::Set(quantity)
        }
    }
}

/// Checks the quantity of an add request.
///
/// # Errors
///
/// Returns `DomainError::Validation` when `quantity` is below 1 or above
/// [`MAX_LINE_QUANTITY`].
pub fn validate_add_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::Validation(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    validate_line_quantity(quantity)
}

/// Checks that a cart line may hold `quantity`.
///
/// # Errors
///
/// Returns `DomainError::Validation` above [`MAX_LINE_QUANTITY`].
pub fn validate_line_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(DomainError::Validation(format!(
            "a cart line holds at most {MAX_LINE_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

/// Quantity the line for `product_id` would hold after adding `quantity`.
///
/// # Errors
///
/// Returns `DomainError::Validation` when the sum exceeds
/// [`MAX_LINE_QUANTITY`].
pub fn quantity_after_add(
    cart: &Cart,
    product_id: Uuid,
    quantity: i32,
) -> Result<i32, DomainError> {
    let existing = cart
        .items
        .iter()
        .find(|item| item.product_id == product_id)
        .map_or(0, |item| item.quantity);
    let combined = existing.checked_add(quantity).ok_or_else(|| {
        DomainError::Validation(format!("a cart line holds at most {MAX_LINE_QUANTITY}"))
    })?;
    validate_line_quantity(combined)?;
    Ok(combined)
}

/// Finds an item of `cart`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the item is not in this cart.
pub fn find_item(cart: &Cart, item_id: Uuid) -> Result<&CartItem, DomainError> {
    cart.items
        .iter()
        .find(|item| item.id == item_id)
        .ok_or_else(|| DomainError::not_found("cart item", item_id))
}

/// Current price times quantity; zero when the product no longer exists.
#[must_use]
pub fn line_total(item: &CartItem) -> Decimal {
    item.product
        .as_ref()
        .map_or(Decimal::ZERO, |product| {
            product.price * Decimal::from(item.quantity)
        })
}

/// Sum of every line total.
#[must_use]
pub fn cart_total(cart: &Cart) -> Decimal {
    cart.items.iter().map(line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use farmconnect_test_support::fixtures::{self, money};

    fn item(price: &str, quantity: i32) -> CartItem {
        let product = fixtures::product(Uuid::new_v4(), money(price));
        CartItem {
            id: Uuid::new_v4(),
            product_id: product.id,
            quantity,
            added_at: Utc::now(),
            product: Some(product),
        }
    }

    fn cart(items: Vec<CartItem>) -> Cart {
        let now = Utc::now();
        Cart {
            id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            version: 0,
            items,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_quantity_change_removes_at_zero_or_below() {
        assert_eq!(QuantityChange::from_requested(0), QuantityChange::Remove);
        assert_eq!(QuantityChange::from_requested(-3), QuantityChange::Remove);
        assert_eq!(QuantityChange::from_requested(4), QuantityChange::Set(4));
    }

    #[test]
    fn test_validate_add_quantity_rejects_zero() {
        assert!(validate_add_quantity(1).is_ok());
        assert!(matches!(
            validate_add_quantity(0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_add_quantity_rejects_above_line_maximum() {
        assert!(validate_add_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(matches!(
            validate_add_quantity(MAX_LINE_QUANTITY + 1),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            validate_add_quantity(i32::MAX),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_quantity_after_add_sums_with_existing_line() {
        // Arrange
        let cart = cart(vec![item("2.00", 9_000)]);
        let product_id = cart.items[0].product_id;

        // Act
        let filled = quantity_after_add(&cart, product_id, 1_000);
        let overfilled = quantity_after_add(&cart, product_id, 1_001);
        let fresh = quantity_after_add(&cart, Uuid::new_v4(), 5);

        // Assert
        assert_eq!(filled.unwrap(), MAX_LINE_QUANTITY);
        assert!(matches!(overfilled, Err(DomainError::Validation(_))));
        assert_eq!(fresh.unwrap(), 5);
    }

    #[test]
    fn test_quantity_after_add_does_not_overflow() {
        let cart = cart(vec![item("1.00", i32::MAX)]);
        let product_id = cart.items[0].product_id;

        let result = quantity_after_add(&cart, product_id, 1);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_cart_total_is_exact_and_skips_deleted_products() {
        // Arrange
        let mut gone = item("99.99", 5);
        gone.product = None;
        let cart = cart(vec![item("0.10", 3), item("19.99", 2), gone]);

        // Act
        let total = cart_total(&cart);

        // Assert
        assert_eq!(total, money("40.28"));
    }

    #[test]
    fn test_find_item_reports_missing_item() {
        let cart = cart(vec![item("1.00", 1)]);

        assert!(find_item(&cart, cart.items[0].id).is_ok());
        assert!(matches!(
            find_item(&cart, Uuid::new_v4()),
            Err(DomainError::NotFound { .. })
        ));
    }
}
