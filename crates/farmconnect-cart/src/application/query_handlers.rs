//! Query handlers for the Cart context.

use chrono::{DateTime, Utc};
use farmconnect_core::clock::Clock;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AccountRole, Cart, CartItem, Product};
use farmconnect_core::repository::CartRepository;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::cart;

/// Read-only view of a cart item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItemView {
    /// Item identifier.
    pub id: Uuid,
    /// The product as currently listed; `None` once deleted.
    pub product: Option<Product>,
    /// Product identifier.
    pub product_id: Uuid,
    /// Quantity in the cart.
    pub quantity: i32,
    /// Current price times quantity.
    pub total: Decimal,
    /// Time the product was first added.
    pub added_at: DateTime<Utc>,
}

/// Read-only view of a cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    /// Cart identifier.
    pub id: Uuid,
    /// Owning buyer.
    pub buyer_id: Uuid,
    /// Items in insertion order.
    pub items: Vec<CartItemView>,
    /// Sum of item totals at current prices.
    pub total: Decimal,
    /// Number of distinct items.
    pub item_count: usize,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            product: item.product.clone(),
            product_id: item.product_id,
            quantity: item.quantity,
            total: cart::line_total(item),
            added_at: item.added_at,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(value: &Cart) -> Self {
        Self {
            id: value.id,
            buyer_id: value.buyer_id,
            items: value.items.iter().map(CartItemView::from).collect(),
            total: cart::cart_total(value),
            item_count: value.items.len(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Returns the buyer's cart, creating an empty one on first access.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-buyer accounts or the repository
/// error.
pub async fn get_cart(
    buyer: &Account,
    clock: &dyn Clock,
    repo: &dyn CartRepository,
) -> Result<CartView, DomainError> {
    buyer.ensure_role(AccountRole::Buyer)?;
    let cart = repo.ensure_cart(buyer.id, clock.now()).await?;
    Ok(CartView::from(&cart))
}

#[cfg(test)]
mod tests {
    use farmconnect_core::repository::CartRepository;
    use farmconnect_test_support::fixtures::{self, money};
    use farmconnect_test_support::{FailingStore, FixedClock, InMemoryStore};

    use super::*;

    #[tokio::test]
    async fn test_get_cart_creates_empty_cart_once() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::standard();
        let buyer = fixtures::buyer();

        // Act
        let first = get_cart(&buyer, &clock, &store).await.unwrap();
        let second = get_cart(&buyer, &clock, &store).await.unwrap();

        // Assert
        assert_eq!(first.id, second.id);
        assert!(first.items.is_empty());
        assert_eq!(first.total, Decimal::ZERO);
        assert_eq!(first.item_count, 0);
    }

    #[tokio::test]
    async fn test_get_cart_reports_totals_and_item_count() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::standard();
        let buyer = fixtures::buyer();
        let seller = fixtures::seller();
        let onions = fixtures::product(seller.id, money("32.50"));
        let ghee = fixtures::product(seller.id, money("610.00"));
        store.seed_product(&onions);
        store.seed_product(&ghee);
        let cart = store.ensure_cart(buyer.id, clock.0).await.unwrap();
        store.add_item(cart.id, onions.id, 4, clock.0).await.unwrap();
        store.add_item(cart.id, ghee.id, 1, clock.0).await.unwrap();

        // Act
        let view = get_cart(&buyer, &clock, &store).await.unwrap();

        // Assert
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, money("740.00"));
        let onion_line = view
            .items
            .iter()
            .find(|item| item.product_id == onions.id)
            .unwrap();
        assert_eq!(onion_line.total, money("130.00"));
    }

    #[tokio::test]
    async fn test_get_cart_rejects_sellers() {
        let result = get_cart(
            &fixtures::seller(),
            &FixedClock::standard(),
            &InMemoryStore::new(),
        )
        .await;

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_cart_propagates_failure() {
        let result = get_cart(&fixtures::buyer(), &FixedClock::standard(), &FailingStore).await;
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[test]
    fn test_cart_view_serializes_money_as_strings() {
        let now = Utc::now();
        let cart = Cart {
            id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            version: 3,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(CartView::from(&cart)).unwrap();

        assert_eq!(json["total"], "0");
        assert_eq!(json["item_count"], 0);
    }
}
