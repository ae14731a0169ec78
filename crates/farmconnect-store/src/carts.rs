use async_trait::async_trait;
use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Cart, MAX_LINE_QUANTITY};
use farmconnect_core::repository::CartRepository;
use sqlx::{PgConnection, query_scalar};
use uuid::Uuid;

use crate::catalog::load_products;
use crate::pg_store::{PgStore, db_error};
use crate::rows::{CartItemRow, CartRow};

/// Locks the cart row for the rest of the transaction and returns its version.
pub(crate) async fn lock_cart(conn: &mut PgConnection, cart_id: Uuid) -> Result<i64, DomainError> {
    query_scalar::<_, i64>("SELECT version FROM carts WHERE id = $1 FOR UPDATE")
        .bind(cart_id)
        .fetch_optional(conn)
        .await
        .map_err(db_error)?
        .ok_or_else(|| DomainError::not_found("cart", cart_id))
}

/// Bumps the cart version; the caller must hold the row lock.
pub(crate) async fn bump_version(
    conn: &mut PgConnection,
    cart_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    sqlx::query("UPDATE carts SET version = version + 1, updated_at = $2 WHERE id = $1")
        .bind(cart_id)
        .bind(now)
        .execute(conn)
        .await
        .map_err(db_error)?;
    Ok(())
}

#[async_trait]
impl CartRepository for PgStore {
    async fn find_cart(&self, buyer_id: Uuid) -> Result<Option<Cart>, DomainError> {
        // The version is read before the items, so a concurrent change is
        // always visible as a stale version at checkout.
        let cart: Option<CartRow> = sqlx::query_as(
            "SELECT id, buyer_id, version, created_at, updated_at FROM carts WHERE buyer_id = $1",
        )
        .bind(buyer_id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;
        let Some(cart) = cart else {
            return Ok(None);
        };

        let rows: Vec<CartItemRow> = sqlx::query_as(
            "SELECT id, product_id, quantity, added_at FROM cart_items \
             WHERE cart_id = $1 ORDER BY added_at, id",
        )
        .bind(cart.id)
        .fetch_all(self.pool())
        .await
        .map_err(db_error)?;

        let product_ids: Vec<Uuid> = rows.iter().map(|row| row.product_id).collect();
        let mut products = load_products(self.pool(), &product_ids).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let product = products.remove(&row.product_id);
                row.into_item(product)
            })
            .collect();
        Ok(Some(cart.into_cart(items)))
    }

    async fn ensure_cart(&self, buyer_id: Uuid, now: DateTime<Utc>) -> Result<Cart, DomainError> {
        sqlx::query(
            "INSERT INTO carts (id, buyer_id, version, created_at, updated_at) \
             VALUES ($1, $2, 0, $3, $3) ON CONFLICT (buyer_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(buyer_id)
        .bind(now)
        .execute(self.pool())
        .await
        .map_err(db_error)?;

        self.find_cart(buyer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("cart", buyer_id))
    }

    async fn add_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        // Keeps the summed quantity inside INTEGER so the table check decides.
        if quantity > MAX_LINE_QUANTITY {
            return Err(DomainError::Validation(format!(
                "a cart line holds at most {MAX_LINE_QUANTITY}, got {quantity}"
            )));
        }
        let mut tx = self.begin().await?;
        lock_cart(&mut tx, cart_id).await?;

        let exists: bool = query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;
        if !exists {
            return Err(DomainError::not_found("product", product_id));
        }

        sqlx::query(
            "INSERT INTO cart_items (id, cart_id, product_id, quantity, added_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (cart_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(Uuid::new_v4())
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        bump_version(&mut tx, cart_id, now).await?;
        tx.commit().await.map_err(db_error)
    }

    async fn set_item_quantity(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        quantity: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        lock_cart(&mut tx, cart_id).await?;

        let result =
            sqlx::query("UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND id = $2")
                .bind(cart_id)
                .bind(item_id)
                .bind(quantity)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("cart item", item_id));
        }

        bump_version(&mut tx, cart_id, now).await?;
        tx.commit().await.map_err(db_error)
    }

    async fn remove_item(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        lock_cart(&mut tx, cart_id).await?;

        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND id = $2")
            .bind(cart_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("cart item", item_id));
        }

        bump_version(&mut tx, cart_id, now).await?;
        tx.commit().await.map_err(db_error)
    }

    async fn clear_cart(&self, cart_id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        lock_cart(&mut tx, cart_id).await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        bump_version(&mut tx, cart_id, now).await?;
        tx.commit().await.map_err(db_error)
    }
}
