//! Repository abstractions.
//!
//! Each trait method is one unit of work: implementations must make its
//! effects visible all at once or not at all.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::DomainError;
use crate::records::{
    Account, AdminVerification, Cart, Coupon, Order, OrderPlacement, OrderStatus, Product, Rating,
    RatingSummary, StarsSummarizer,
};

/// Persistence for accounts and their verification reviews.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Stores a new account. A taken username or phone is a `Validation` error.
    async fn insert_account(&self, account: &Account) -> Result<(), DomainError>;

    /// Loads an account by ID.
    async fn find_account(&self, account_id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Stores a review and sets the account's `is_verified` flag to
    /// `verification.approved`.
    async fn record_verification(
        &self,
        verification: &AdminVerification,
    ) -> Result<(), DomainError>;
}

/// Persistence for the product catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Stores a new product.
    async fn insert_product(&self, product: &Product) -> Result<(), DomainError>;

    /// Loads a product by ID.
    async fn find_product(&self, product_id: Uuid) -> Result<Option<Product>, DomainError>;

    /// Lists every product ordered by name.
    async fn list_products(&self) -> Result<Vec<Product>, DomainError>;

    /// Replaces a product's price. Rating fields are left untouched.
    async fn update_price(
        &self,
        product_id: Uuid,
        price: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}

/// Persistence for buyer carts. Every mutation bumps the cart version.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Loads the buyer's cart with its items and their current products.
    async fn find_cart(&self, buyer_id: Uuid) -> Result<Option<Cart>, DomainError>;

    /// Loads the buyer's cart, creating an empty one on first access.
    async fn ensure_cart(&self, buyer_id: Uuid, now: DateTime<Utc>) -> Result<Cart, DomainError>;

    /// Adds `quantity` of a product, incrementing the existing line if any.
    async fn add_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Overwrites the quantity of an item of this cart.
    async fn set_item_quantity(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        quantity: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Deletes an item of this cart.
    async fn remove_item(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Deletes every item of this cart.
    async fn clear_cart(&self, cart_id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError>;
}

/// Persistence for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Commits a checkout: verifies the cart still has
    /// `placement.expected_cart_version` and that every ordered product still
    /// exists at its snapshotted price, inserts every order with its items and
    /// empties the cart.
    ///
    /// A changed cart or price is a `ConcurrencyConflict`; a vanished product
    /// is `ProductUnavailable`. Nothing is written on error.
    async fn place_orders(&self, placement: &OrderPlacement) -> Result<(), DomainError>;

    /// Loads an order with its items.
    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError>;

    /// Orders placed by a buyer, newest first.
    async fn list_orders_for_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError>;

    /// Orders received by a seller, newest first.
    async fn list_orders_for_seller(&self, seller_id: Uuid) -> Result<Vec<Order>, DomainError>;

    /// Moves an order from `expected` to `next`; a different current status
    /// is a `ConcurrencyConflict`.
    async fn update_order_status(
        &self,
        order_id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<(), DomainError>;
}

/// Persistence for ratings and the product aggregate they drive.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Stores a rating. A second rating for the same order is a `Validation` error.
    async fn insert_rating(&self, rating: &Rating) -> Result<(), DomainError>;

    /// Loads the rating attached to an order, if any.
    async fn find_rating_for_order(&self, order_id: Uuid) -> Result<Option<Rating>, DomainError>;

    /// Reads every star value of the product, summarizes them and writes the
    /// result onto the product. Concurrent calls for one product serialize.
    async fn recompute_product_rating(
        &self,
        product_id: Uuid,
        summarize: StarsSummarizer,
    ) -> Result<RatingSummary, DomainError>;
}

/// Persistence for coupons.
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Stores a coupon. A taken code is a `Validation` error.
    async fn insert_coupon(&self, coupon: &Coupon) -> Result<(), DomainError>;

    /// Loads a coupon by code.
    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, DomainError>;
}

/// Everything the application needs from a store.
pub trait MarketStore:
    AccountRepository
    + ProductRepository
    + CartRepository
    + OrderRepository
    + RatingRepository
    + CouponRepository
{
}

impl<T> MarketStore for T where
    T: AccountRepository
        + ProductRepository
        + CartRepository
        + OrderRepository
        + RatingRepository
        + CouponRepository
{
}
