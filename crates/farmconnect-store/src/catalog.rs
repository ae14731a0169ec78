use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Coupon, Product};
use farmconnect_core::repository::{CouponRepository, ProductRepository};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::pg_store::{PgStore, db_error};
use crate::rows::{CouponRow, PRODUCT_COLUMNS, ProductRow};

/// Loads the products with the given IDs, keyed by ID. Missing IDs are
/// simply absent from the map.
pub(crate) async fn load_products(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Product>, DomainError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
    let rows: Vec<ProductRow> = sqlx::query_as(&sql)
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(db_error)?;
    rows.into_iter()
        .map(|row| Product::try_from(row).map(|p| (p.id, p)))
        .collect()
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn insert_product(&self, product: &Product) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO products \
             (id, seller_id, name, description, category, price, unit, available_quantity, \
              in_stock, freshness, image, rating, total_ratings, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(product.id)
        .bind(product.seller_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category.as_str())
        .bind(product.price)
        .bind(&product.unit)
        .bind(product.available_quantity)
        .bind(product.in_stock)
        .bind(product.freshness.as_str())
        .bind(product.image.as_deref())
        .bind(product.rating)
        .bind(product.total_ratings)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(self.pool())
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_product(&self, product_id: Uuid) -> Result<Option<Product>, DomainError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(product_id)
            .fetch_optional(self.pool())
            .await
            .map_err(db_error)?;
        row.map(Product::try_from).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(db_error)?;
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn update_price(
        &self,
        product_id: Uuid,
        price: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE products SET price = $2, updated_at = $3 WHERE id = $1")
            .bind(product_id)
            .bind(price)
            .bind(updated_at)
            .execute(self.pool())
            .await
            .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("product", product_id));
        }
        Ok(())
    }
}

#[async_trait]
impl CouponRepository for PgStore {
    async fn insert_coupon(&self, coupon: &Coupon) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO coupons (id, code, valid_from, valid_to, discount, active) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(coupon.id)
        .bind(&coupon.code)
        .bind(coupon.valid_from)
        .bind(coupon.valid_to)
        .bind(coupon.discount)
        .bind(coupon.active)
        .execute(self.pool())
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, DomainError> {
        let row: Option<CouponRow> = sqlx::query_as(
            "SELECT id, code, valid_from, valid_to, discount, active \
             FROM coupons WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;
        Ok(row.map(Coupon::from))
    }
}
