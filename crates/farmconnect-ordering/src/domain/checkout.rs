//! Checkout planning.
//!
//! A plan is computed from a cart snapshot and committed later in one unit by
//! `OrderRepository::place_orders`, which rejects the plan if the cart or any
//! snapshotted price changed in between.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{
    Cart, CartItem, MAX_ORDER_TOTAL, Order, OrderItem, OrderPlacement, OrderStatus, Product,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Builds one pending order per seller from the items of `cart`.
///
/// Each order item copies the cart quantity and the product's current price.
/// The orders are returned in no particular order.
///
/// # Errors
///
/// Returns `DomainError::EmptyCart` when the cart has no items,
/// `DomainError::ProductUnavailable` when an item's product no longer exists
/// and `DomainError::Validation` when an order total would exceed
/// [`MAX_ORDER_TOTAL`].
pub fn plan_checkout(
    cart: &Cart,
    delivery_address: &str,
    now: DateTime<Utc>,
) -> Result<OrderPlacement, DomainError> {
    if cart.items.is_empty() {
        return Err(DomainError::EmptyCart);
    }

    let mut by_seller: HashMap<Uuid, Vec<(&CartItem, &Product)>> = HashMap::new();
    for item in &cart.items {
        let product = item
            .product
            .as_ref()
            .ok_or(DomainError::ProductUnavailable(item.product_id))?;
        by_seller
            .entry(product.seller_id)
            .or_default()
            .push((item, product));
    }

    let orders = by_seller
        .into_iter()
        .map(|(seller_id, lines)| {
            let order_id = Uuid::new_v4();
            let items: Vec<OrderItem> = lines
                .into_iter()
                .map(|(item, product)| OrderItem {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: Some(product.id),
                    quantity: item.quantity,
                    price_at_order_time: product.price,
                })
                .collect();
            let total_amount: Decimal = items.iter().map(OrderItem::total).sum();
            if total_amount > MAX_ORDER_TOTAL {
                return Err(DomainError::Validation(format!(
                    "order total {total_amount} for seller {seller_id} exceeds {MAX_ORDER_TOTAL}"
                )));
            }
            Ok(Order {
                id: order_id,
                buyer_id: cart.buyer_id,
                seller_id,
                total_amount,
                status: OrderStatus::Pending,
                order_date: now,
                delivery_eta: None,
                delivery_address: delivery_address.to_owned(),
                items,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OrderPlacement {
        cart_id: cart.id,
        expected_cart_version: cart.version,
        orders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmconnect_test_support::fixtures::{self, money};

    fn line(seller_id: Uuid, price: &str, quantity: i32) -> CartItem {
        let product = fixtures::product(seller_id, money(price));
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
            version: 7,
            items,
            created_at: now,
            updated_at: now,
        }
    }

    fn pairs(orders: &[Order]) -> Vec<(Uuid, i32)> {
        let mut pairs: Vec<(Uuid, i32)> = orders
            .iter()
            .flat_map(|o| &o.items)
            .filter_map(|i| i.product_id.map(|p| (p, i.quantity)))
            .collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_plan_checkout_splits_two_sellers() {
        // Arrange
        let s1 = Uuid::new_v4();
        let s2 = Uuid::new_v4();
        let a = line(s1, "50.00", 2);
        let b = line(s2, "30.00", 1);
        let cart = cart(vec![a.clone(), b.clone()]);
        let now = Utc::now();

        // Act
        let plan = plan_checkout(&cart, "", now).unwrap();

        // Assert
        assert_eq!(plan.cart_id, cart.id);
        assert_eq!(plan.expected_cart_version, 7);
        assert_eq!(plan.orders.len(), 2);
        let first = plan.orders.iter().find(|o| o.seller_id == s1).unwrap();
        assert_eq!(first.total_amount, money("100.00"));
        assert_eq!(first.items.len(), 1);
        assert_eq!(first.items[0].product_id, Some(a.product_id));
        assert_eq!(first.items[0].quantity, 2);
        assert_eq!(first.items[0].price_at_order_time, money("50.00"));
        let second = plan.orders.iter().find(|o| o.seller_id == s2).unwrap();
        assert_eq!(second.total_amount, money("30.00"));
        assert_eq!(second.items[0].product_id, Some(b.product_id));
        for order in &plan.orders {
            assert_eq!(order.status, OrderStatus::Pending);
            assert_eq!(order.buyer_id, cart.buyer_id);
            assert_eq!(order.order_date, now);
            assert!(order.items.iter().all(|i| i.order_id == order.id));
        }
    }

    #[test]
    fn test_plan_checkout_one_order_per_seller_and_exact_totals() {
        // Arrange
        let sellers: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let items = vec![
            line(sellers[0], "0.10", 3),
            line(sellers[1], "0.20", 1),
            line(sellers[0], "19.99", 2),
            line(sellers[2], "1.01", 9),
            line(sellers[1], "0.70", 1),
        ];
        let expected_pairs = {
            let mut p: Vec<(Uuid, i32)> =
                items.iter().map(|i| (i.product_id, i.quantity)).collect();
            p.sort();
            p
        };
        let cart = cart(items);

        // Act
        let plan = plan_checkout(&cart, "Plot 4, Pune", Utc::now()).unwrap();

        // Assert
        assert_eq!(plan.orders.len(), 3);
        assert_eq!(pairs(&plan.orders), expected_pairs);
        let grand: Decimal = plan.orders.iter().map(|o| o.total_amount).sum();
        assert_eq!(grand, money("50.27"));
        let s1 = plan.orders.iter().find(|o| o.seller_id == sellers[1]).unwrap();
        assert_eq!(s1.total_amount, money("0.90"));
        assert!(plan.orders.iter().all(|o| o.delivery_address == "Plot 4, Pune"));
    }

    #[test]
    fn test_plan_checkout_rejects_order_total_above_maximum() {
        // Arrange
        let cart = cart(vec![line(Uuid::new_v4(), "99999999.99", 101)]);

        // Act
        let result = plan_checkout(&cart, "", Utc::now());

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_plan_checkout_accepts_order_total_at_maximum() {
        let seller = Uuid::new_v4();
        let cart = cart(vec![
            line(seller, "99999999.99", 99),
            line(seller, "99999999.99", 1),
            line(seller, "0.99", 1),
        ]);

        let plan = plan_checkout(&cart, "", Utc::now()).unwrap();

        assert_eq!(plan.orders[0].total_amount, MAX_ORDER_TOTAL);
    }

    #[test]
    fn test_plan_checkout_caps_each_seller_separately() {
        let cart = cart(vec![
            line(Uuid::new_v4(), "99999999.99", 99),
            line(Uuid::new_v4(), "99999999.99", 99),
        ]);

        let plan = plan_checkout(&cart, "", Utc::now()).unwrap();

        assert_eq!(plan.orders.len(), 2);
        assert!(plan.orders.iter().all(|o| o.total_amount <= MAX_ORDER_TOTAL));
    }

    #[test]
    fn test_plan_checkout_rejects_empty_cart() {
        let result = plan_checkout(&cart(Vec::new()), "", Utc::now());
        assert!(matches!(result, Err(DomainError::EmptyCart)));
    }

    #[test]
    fn test_plan_checkout_rejects_deleted_product() {
        let mut gone = line(Uuid::new_v4(), "5.00", 1);
        gone.product = None;
        let missing = gone.product_id;
        let cart = cart(vec![line(Uuid::new_v4(), "1.00", 1), gone]);

        let result = plan_checkout(&cart, "", Utc::now());

        match result {
            Err(DomainError::ProductUnavailable(id)) => assert_eq!(id, missing),
            other => panic!("expected ProductUnavailable, got {other:?}"),
        }
    }
}
