//! Marketplace database schema.
//!
//! The DDL lives in the workspace `migrations/` directory and is embedded
//! here. Constraint names are the ones the store maps to domain errors.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Unique username.
pub const ACCOUNTS_USERNAME_KEY: &str = "accounts_username_key";
/// Unique phone number.
pub const ACCOUNTS_PHONE_KEY: &str = "accounts_phone_key";
/// One rating per order.
pub const RATINGS_ORDER_ID_KEY: &str = "ratings_order_id_key";
/// Cart line quantity bounds, mirroring `MAX_LINE_QUANTITY`.
pub const CART_ITEMS_QUANTITY_CHECK: &str = "cart_items_quantity_check";
/// Unique coupon code.
pub const COUPONS_CODE_KEY: &str = "coupons_code_key";

/// Applies every pending migration.
///
/// # Errors
///
/// Returns the migration error if a migration fails or the applied history
/// does not match the embedded one.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
