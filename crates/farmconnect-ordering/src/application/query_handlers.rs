//! Query handlers for the Ordering context.

use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AccountRole, Order, OrderItem, OrderStatus};
use farmconnect_core::repository::OrderRepository;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::status;

/// Read-only view of an order line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemView {
    /// Item identifier.
    pub id: Uuid,
    /// Ordered product; `None` once the product is deleted.
    pub product_id: Option<Uuid>,
    /// Ordered quantity.
    pub quantity: i32,
    /// Price frozen at checkout.
    pub price_at_order_time: Decimal,
    /// Quantity times frozen price.
    pub total: Decimal,
}

/// Read-only view of an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    /// Order identifier.
    pub id: Uuid,
    /// Buyer who placed the order.
    pub buyer_id: Uuid,
    /// Seller who receives the order.
    pub seller_id: Uuid,
    /// Order total.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Creation time.
    pub order_date: DateTime<Utc>,
    /// Expected delivery time.
    pub delivery_eta: Option<DateTime<Utc>>,
    /// Delivery address.
    pub delivery_address: String,
    /// Line items.
    pub items: Vec<OrderItemView>,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            price_at_order_time: item.price_at_order_time,
            total: item.total(),
        }
    }
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            buyer_id: order.buyer_id,
            seller_id: order.seller_id,
            total_amount: order.total_amount,
            status: order.status,
            order_date: order.order_date,
            delivery_eta: order.delivery_eta,
            delivery_address: order.delivery_address.clone(),
            items: order.items.iter().map(OrderItemView::from).collect(),
        }
    }
}

/// Orders visible to `account`, newest first: a buyer sees the orders they
/// placed, a seller the orders they received, an admin none.
///
/// # Errors
///
/// Returns the repository error.
pub async fn list_orders(
    account: &Account,
    repo: &dyn OrderRepository,
) -> Result<Vec<OrderView>, DomainError> {
    let orders = match account.role {
        AccountRole::Buyer => repo.list_orders_for_buyer(account.id).await?,
        AccountRole::Seller => repo.list_orders_for_seller(account.id).await?,
        AccountRole::Admin => Vec::new(),
    };
    Ok(orders.iter().map(OrderView::from).collect())
}

/// Retrieves an order for its buyer or seller.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown order and
/// `DomainError::Forbidden` when `account` is not a party to it.
pub async fn get_order(
    account: &Account,
    order_id: Uuid,
    repo: &dyn OrderRepository,
) -> Result<OrderView, DomainError> {
    let order = repo
        .find_order(order_id)
        .await?
        .ok_or_else(|| DomainError::not_found("order", order_id))?;
    status::ensure_party(account, &order)?;
    Ok(OrderView::from(&order))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use farmconnect_test_support::fixtures::{self, money};
    use farmconnect_test_support::{FailingStore, InMemoryStore};

    use super::*;

    fn order(buyer: &Account, seller: &Account, day: u32) -> Order {
        let id = Uuid::new_v4();
        Order {
            id,
            buyer_id: buyer.id,
            seller_id: seller.id,
            total_amount: money("60.00"),
            status: OrderStatus::Pending,
            order_date: Utc.with_ymd_and_hms(2026, 2, day, 9, 0, 0).unwrap(),
            delivery_eta: None,
            delivery_address: String::new(),
            items: vec![OrderItem {
                id: Uuid::new_v4(),
                order_id: id,
                product_id: Some(Uuid::new_v4()),
                quantity: 3,
                price_at_order_time: money("20.00"),
            }],
        }
    }

    #[tokio::test]
    async fn test_list_orders_depends_on_role() {
        // Arrange
        let store = InMemoryStore::new();
        let buyer = fixtures::buyer();
        let seller = fixtures::seller();
        let older = order(&buyer, &seller, 1);
        let newer = order(&buyer, &seller, 2);
        let unrelated = order(&fixtures::buyer(), &fixtures::seller(), 3);
        for o in [&older, &newer, &unrelated] {
            store.seed_order(o);
        }

        // Act
        let for_buyer = list_orders(&buyer, &store).await.unwrap();
        let for_seller = list_orders(&seller, &store).await.unwrap();
        let for_admin = list_orders(&fixtures::admin(), &store).await.unwrap();

        // Assert
        let ids: Vec<Uuid> = for_buyer.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(for_seller.len(), 2);
        assert!(for_admin.is_empty());
    }

    #[tokio::test]
    async fn test_get_order_includes_line_totals() {
        let store = InMemoryStore::new();
        let buyer = fixtures::buyer();
        let seller = fixtures::seller();
        let placed = order(&buyer, &seller, 4);
        store.seed_order(&placed);

        let view = get_order(&seller, placed.id, &store).await.unwrap();

        assert_eq!(view.items[0].total, money("60.00"));
        assert_eq!(view.total_amount, money("60.00"));
    }

    #[tokio::test]
    async fn test_get_order_hides_order_from_outsiders() {
        let store = InMemoryStore::new();
        let placed = order(&fixtures::buyer(), &fixtures::seller(), 5);
        store.seed_order(&placed);

        let result = get_order(&fixtures::buyer(), placed.id, &store).await;

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_order_returns_not_found() {
        let result = get_order(&fixtures::buyer(), Uuid::new_v4(), &InMemoryStore::new()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_orders_propagates_failure() {
        let result = list_orders(&fixtures::seller(), &FailingStore).await;
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[test]
    fn test_order_view_keeps_delivery_eta() {
        let buyer = fixtures::buyer();
        let seller = fixtures::seller();
        let mut placed = order(&buyer, &seller, 6);
        let eta = placed.order_date + Duration::days(2);
        placed.delivery_eta = Some(eta);

        let view = OrderView::from(&placed);

        assert_eq!(view.delivery_eta, Some(eta));
    }
}
