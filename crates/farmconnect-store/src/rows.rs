//! Database row types and their conversion into records.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{
    Account, Cart, CartItem, Coupon, Order, OrderItem, Product, Rating,
};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Parses a string column into one of the record enums.
fn decode<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse().map_err(|e: DomainError| {
        DomainError::Infrastructure(format!("corrupt {column} column: {e}"))
    })
}

pub(crate) const ACCOUNT_COLUMNS: &str =
    "id, username, role, phone, location, address, is_verified, created_at";

#[derive(Debug, FromRow)]
pub(crate) struct AccountRow {
    id: Uuid,
    username: String,
    role: String,
    phone: String,
    location: Option<String>,
    address: Option<String>,
    is_verified: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            username: row.username,
            role: decode("role", &row.role)?,
            phone: row.phone,
            location: row.location,
            address: row.address,
            is_verified: row.is_verified,
            created_at: row.created_at,
        })
    }
}

pub(crate) const PRODUCT_COLUMNS: &str = "id, seller_id, name, description, category, price, \
     unit, available_quantity, in_stock, freshness, image, rating, total_ratings, \
     created_at, updated_at";

#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
    id: Uuid,
    seller_id: Uuid,
    name: String,
    description: String,
    category: String,
    price: Decimal,
    unit: String,
    available_quantity: f64,
    in_stock: bool,
    freshness: String,
    image: Option<String>,
    rating: Decimal,
    total_ratings: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            seller_id: row.seller_id,
            name: row.name,
            description: row.description,
            category: decode("category", &row.category)?,
            price: row.price,
            unit: row.unit,
            available_quantity: row.available_quantity,
            in_stock: row.in_stock,
            freshness: decode("freshness", &row.freshness)?,
            image: row.image,
            rating: row.rating,
            total_ratings: row.total_ratings,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CartRow {
    pub(crate) id: Uuid,
    pub(crate) buyer_id: Uuid,
    pub(crate) version: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl CartRow {
    pub(crate) fn into_cart(self, items: Vec<CartItem>) -> Cart {
        Cart {
            id: self.id,
            buyer_id: self.buyer_id,
            version: self.version,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CartItemRow {
    pub(crate) id: Uuid,
    pub(crate) product_id: Uuid,
    pub(crate) quantity: i32,
    pub(crate) added_at: DateTime<Utc>,
}

impl CartItemRow {
    pub(crate) fn into_item(self, product: Option<Product>) -> CartItem {
        CartItem {
            id: self.id,
            product_id: self.product_id,
            quantity: self.quantity,
            added_at: self.added_at,
            product,
        }
    }
}

pub(crate) const ORDER_COLUMNS: &str = "id, buyer_id, seller_id, total_amount, status, \
     order_date, delivery_eta, delivery_address";

#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
    pub(crate) id: Uuid,
    buyer_id: Uuid,
    seller_id: Uuid,
    total_amount: Decimal,
    status: String,
    order_date: DateTime<Utc>,
    delivery_eta: Option<DateTime<Utc>>,
    delivery_address: String,
}

impl OrderRow {
    pub(crate) fn into_order(self, items: Vec<OrderItem>) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.id,
            buyer_id: self.buyer_id,
            seller_id: self.seller_id,
            total_amount: self.total_amount,
            status: decode("status", &self.status)?,
            order_date: self.order_date,
            delivery_eta: self.delivery_eta,
            delivery_address: self.delivery_address,
            items,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderItemRow {
    id: Uuid,
    pub(crate) order_id: Uuid,
    product_id: Option<Uuid>,
    quantity: i32,
    price_at_order_time: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price_at_order_time: row.price_at_order_time,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RatingRow {
    id: Uuid,
    buyer_id: Uuid,
    seller_id: Uuid,
    product_id: Uuid,
    order_id: Uuid,
    stars: i32,
    feedback: String,
    created_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Self {
            id: row.id,
            buyer_id: row.buyer_id,
            seller_id: row.seller_id,
            product_id: row.product_id,
            order_id: row.order_id,
            stars: row.stars,
            feedback: row.feedback,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CouponRow {
    id: Uuid,
    code: String,
    valid_from: DateTime<Utc>,
    valid_to: DateTime<Utc>,
    discount: i32,
    active: bool,
}

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            discount: row.discount,
            active: row.active,
        }
    }
}
