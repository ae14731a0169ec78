//! Record builders with sensible defaults.

use chrono::{TimeZone, Utc};
use farmconnect_core::records::{Account, AccountRole, Category, Freshness, Product};
use rust_decimal::Decimal;
use uuid::Uuid;

/// An unverified account with the given role and a unique username and phone.
///
/// # Panics
///
/// Never; the literal date is valid.
#[must_use]
pub fn account(role: AccountRole) -> Account {
    let id = Uuid::new_v4();
    let simple = id.simple().to_string();
    Account {
        id,
        username: format!("{role}-{}", &simple[..8]),
        role,
        phone: simple[..12].to_owned(),
        location: None,
        address: None,
        is_verified: false,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
    }
}

/// A buyer account.
#[must_use]
pub fn buyer() -> Account {
    account(AccountRole::Buyer)
}

/// A seller account.
#[must_use]
pub fn seller() -> Account {
    account(AccountRole::Seller)
}

/// An admin account.
#[must_use]
pub fn admin() -> Account {
    account(AccountRole::Admin)
}

/// An in-stock vegetable product owned by `seller_id` at `price`.
///
/// # Panics
///
/// Never; the literal date is valid.
#[must_use]
pub fn product(seller_id: Uuid, price: Decimal) -> Product {
    let created_at = Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap();
    Product {
        id: Uuid::new_v4(),
        seller_id,
        name: "Tomatoes".to_owned(),
        description: "Vine ripened".to_owned(),
        category: Category::Vegetables,
        price,
        unit: "per kg".to_owned(),
        available_quantity: 100.0,
        in_stock: true,
        freshness: Freshness::Fresh,
        image: None,
        rating: Decimal::new(0, 2),
        total_ratings: 0,
        created_at,
        updated_at: created_at,
    }
}

/// Parses a decimal literal such as `"50.00"`.
///
/// # Panics
///
/// Panics if `value` is not a decimal literal.
#[must_use]
pub fn money(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}
