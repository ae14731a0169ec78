use std::collections::HashMap;

use async_trait::async_trait;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Order, OrderItem, OrderPlacement, OrderStatus};
use farmconnect_core::repository::OrderRepository;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::carts::{bump_version, lock_cart};
use crate::pg_store::{PgStore, db_error};
use crate::rows::{ORDER_COLUMNS, OrderItemRow, OrderRow};

/// Attaches items to order rows, preserving the row order.
async fn with_items(pool: &PgPool, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let item_rows: Vec<OrderItemRow> = sqlx::query_as(
        "SELECT id, order_id, product_id, quantity, price_at_order_time \
         FROM order_items WHERE order_id = ANY($1) ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    let mut items: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for row in item_rows {
        items.entry(row.order_id).or_default().push(row.into());
    }
    rows.into_iter()
        .map(|row| {
            let own = items.remove(&row.id).unwrap_or_default();
            row.into_order(own)
        })
        .collect()
}

impl PgStore {
    async fn orders_where(&self, column: &str, account_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE {column} = $1 ORDER BY order_date DESC, id"
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(account_id)
            .fetch_all(self.pool())
            .await
            .map_err(db_error)?;
        with_items(self.pool(), rows).await
    }
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn place_orders(&self, placement: &OrderPlacement) -> Result<(), DomainError> {
        let cart_id = placement.cart_id;
        let mut tx = self.begin().await?;

        let version = lock_cart(&mut tx, cart_id).await?;
        if version != placement.expected_cart_version {
            return Err(DomainError::ConcurrencyConflict {
                entity: "cart",
                id: cart_id,
            });
        }

        let product_ids: Vec<Uuid> = placement
            .orders
            .iter()
            .flat_map(|o| &o.items)
            .filter_map(|item| item.product_id)
            .collect();
        let current: HashMap<Uuid, Decimal> = sqlx::query_as::<_, (Uuid, Decimal)>(
            "SELECT id, price FROM products WHERE id = ANY($1) FOR SHARE",
        )
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error)?
        .into_iter()
        .collect();
        for item in placement.orders.iter().flat_map(|o| &o.items) {
            let Some(product_id) = item.product_id else {
                continue;
            };
            match current.get(&product_id) {
                None => return Err(DomainError::ProductUnavailable(product_id)),
                Some(price) if *price != item.price_at_order_time => {
                    return Err(DomainError::ConcurrencyConflict {
                        entity: "product",
                        id: product_id,
                    });
                }
                Some(_) => {}
            }
        }

        for order in &placement.orders {
            sqlx::query(
                "INSERT INTO orders \
                 (id, buyer_id, seller_id, total_amount, status, order_date, delivery_eta, \
                  delivery_address) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(order.id)
            .bind(order.buyer_id)
            .bind(order.seller_id)
            .bind(order.total_amount)
            .bind(order.status.as_str())
            .bind(order.order_date)
            .bind(order.delivery_eta)
            .bind(&order.delivery_address)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

            for item in &order.items {
                sqlx::query(
                    "INSERT INTO order_items \
                     (id, order_id, product_id, quantity, price_at_order_time) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(item.id)
                .bind(order.id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.price_at_order_time)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
            }
        }

        let cleared = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        let now = placement
            .orders
            .first()
            .map_or_else(chrono::Utc::now, |o| o.order_date);
        bump_version(&mut tx, cart_id, now).await?;

        tx.commit().await.map_err(db_error)?;
        debug!(
            cart_id = %cart_id,
            orders = placement.orders.len(),
            cart_items_cleared = cleared.rows_affected(),
            "order placement committed"
        );
        Ok(())
    }

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(order_id)
            .fetch_optional(self.pool())
            .await
            .map_err(db_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(with_items(self.pool(), vec![row]).await?.pop())
    }

    async fn list_orders_for_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.orders_where("buyer_id", buyer_id).await
    }

    async fn list_orders_for_seller(&self, seller_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.orders_where("seller_id", seller_id).await
    }

    async fn update_order_status(
        &self,
        order_id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE orders SET status = $3 WHERE id = $1 AND status = $2")
            .bind(order_id)
            .bind(expected.as_str())
            .bind(next.as_str())
            .execute(self.pool())
            .await
            .map_err(db_error)?;
        if result.rows_affected() == 1 {
            return Ok(());
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE id = $1)")
            .bind(order_id)
            .fetch_one(self.pool())
            .await
            .map_err(db_error)?;
        if exists {
            Err(DomainError::ConcurrencyConflict {
                entity: "order",
                id: order_id,
            })
        } else {
            Err(DomainError::not_found("order", order_id))
        }
    }
}
