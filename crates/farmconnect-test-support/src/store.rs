//! Test stores: in-memory and always-failing `MarketStore` implementations.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{
    Account, AdminVerification, Cart, CartItem, Coupon, MAX_LINE_QUANTITY, Order,
    OrderPlacement, OrderStatus, Product, Rating, RatingSummary, StarsSummarizer,
};
use farmconnect_core::repository::{
    AccountRepository, CartRepository, CouponRepository, OrderRepository, ProductRepository,
    RatingRepository,
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct CartRow {
    id: Uuid,
    buyer_id: Uuid,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CartItemRow {
    id: Uuid,
    cart_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    added_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    verifications: Vec<AdminVerification>,
    products: HashMap<Uuid, Product>,
    carts: Vec<CartRow>,
    cart_items: Vec<CartItemRow>,
    orders: Vec<Order>,
    ratings: Vec<Rating>,
    coupons: HashMap<String, Coupon>,
}

impl State {
    fn cart_row_mut(&mut self, cart_id: Uuid) -> Result<&mut CartRow, DomainError> {
        self.carts
            .iter_mut()
            .find(|c| c.id == cart_id)
            .ok_or_else(|| DomainError::not_found("cart", cart_id))
    }

    fn touch_cart(&mut self, cart_id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError> {
        let row = self.cart_row_mut(cart_id)?;
        row.version += 1;
        row.updated_at = now;
        Ok(())
    }

    fn assemble_cart(&self, row: &CartRow) -> Cart {
        let items = self
            .cart_items
            .iter()
            .filter(|item| item.cart_id == row.id)
            .map(|item| CartItem {
                id: item.id,
                product_id: item.product_id,
                quantity: item.quantity,
                added_at: item.added_at,
                product: self.products.get(&item.product_id).cloned(),
            })
            .collect();
        Cart {
            id: row.id,
            buyer_id: row.buyer_id,
            version: row.version,
            items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn orders_where(&self, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.iter().filter(|&o| keep(o)).cloned().collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        orders
    }
}

/// A `MarketStore` kept entirely in memory behind one mutex, so every
/// repository call is trivially atomic. Mirrors the semantics of the
/// PostgreSQL store closely enough for application and route tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory store mutex poisoned")
    }

    /// Inserts an account directly, bypassing validation.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed_account(&self, account: &Account) {
        self.state().accounts.insert(account.id, account.clone());
    }

    /// Inserts a product directly, bypassing validation.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed_product(&self, product: &Product) {
        self.state().products.insert(product.id, product.clone());
    }

    /// Inserts a rating directly without recomputing the product aggregate.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed_rating(&self, rating: &Rating) {
        self.state().ratings.push(rating.clone());
    }

    /// Inserts an order directly.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed_order(&self, order: &Order) {
        self.state().orders.push(order.clone());
    }

    /// Deletes a product, leaving cart items that reference it dangling.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn delete_product(&self, product_id: Uuid) {
        self.state().products.remove(&product_id);
    }

    /// Snapshot of a product.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn product(&self, product_id: Uuid) -> Option<Product> {
        self.state().products.get(&product_id).cloned()
    }

    /// Snapshot of an account.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn account(&self, account_id: Uuid) -> Option<Account> {
        self.state().accounts.get(&account_id).cloned()
    }

    /// Snapshot of every stored order, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.state().orders.clone()
    }

    /// Snapshot of every stored verification review.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn verifications(&self) -> Vec<AdminVerification> {
        self.state().verifications.clone()
    }

    /// Number of items in the buyer's cart (zero when there is no cart).
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn cart_item_count(&self, buyer_id: Uuid) -> usize {
        let state = self.state();
        state
            .carts
            .iter()
            .find(|c| c.buyer_id == buyer_id)
            .map_or(0, |cart| {
                state
                    .cart_items
                    .iter()
                    .filter(|item| item.cart_id == cart.id)
                    .count()
            })
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn insert_account(&self, account: &Account) -> Result<(), DomainError> {
        let mut state = self.state();
        if state
            .accounts
            .values()
            .any(|a| a.username == account.username || a.phone == account.phone)
        {
            return Err(DomainError::Validation(
                "username or phone already registered".into(),
            ));
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_account(&self, account_id: Uuid) -> Result<Option<Account>, DomainError> {
        Ok(self.state().accounts.get(&account_id).cloned())
    }

    async fn record_verification(
        &self,
        verification: &AdminVerification,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        let account = state
            .accounts
            .get_mut(&verification.account_id)
            .ok_or_else(|| DomainError::not_found("account", verification.account_id))?;
        account.is_verified = verification.approved;
        state.verifications.push(verification.clone());
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn insert_product(&self, product: &Product) -> Result<(), DomainError> {
        self.state().products.insert(product.id, product.clone());
        Ok(())
    }

    async fn find_product(&self, product_id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.state().products.get(&product_id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let mut products: Vec<Product> = self.state().products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn update_price(
        &self,
        product_id: Uuid,
        price: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        let product = state
            .products
            .get_mut(&product_id)
            .ok_or_else(|| DomainError::not_found("product", product_id))?;
        product.price = price;
        product.updated_at = updated_at;
        Ok(())
    }
}

#[async_trait]
impl CartRepository for InMemoryStore {
    async fn find_cart(&self, buyer_id: Uuid) -> Result<Option<Cart>, DomainError> {
        let state = self.state();
        Ok(state
            .carts
            .iter()
            .find(|c| c.buyer_id == buyer_id)
            .map(|row| state.assemble_cart(row)))
    }

    async fn ensure_cart(&self, buyer_id: Uuid, now: DateTime<Utc>) -> Result<Cart, DomainError> {
        let mut state = self.state();
        if !state.carts.iter().any(|c| c.buyer_id == buyer_id) {
            state.carts.push(CartRow {
                id: Uuid::new_v4(),
                buyer_id,
                version: 0,
                created_at: now,
                updated_at: now,
            });
        }
        let row = state
            .carts
            .iter()
            .find(|c| c.buyer_id == buyer_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("cart", buyer_id))?;
        Ok(state.assemble_cart(&row))
    }

    async fn add_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        state.cart_row_mut(cart_id)?;
        if !state.products.contains_key(&product_id) {
            return Err(DomainError::not_found("product", product_id));
        }
        if let Some(item) = state
            .cart_items
            .iter_mut()
            .find(|item| item.cart_id == cart_id && item.product_id == product_id)
        {
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .filter(|total| *total <= MAX_LINE_QUANTITY)
                .ok_or_else(|| {
                    DomainError::Validation(format!(
                        "a cart line holds at most {MAX_LINE_QUANTITY}"
                    ))
                })?;
        } else {
            state.cart_items.push(CartItemRow {
                id: Uuid::new_v4(),
                cart_id,
                product_id,
                quantity,
                added_at: now,
            });
        }
        state.touch_cart(cart_id, now)
    }

    async fn set_item_quantity(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        quantity: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(DomainError::Validation(format!(
                "cart line quantity must be between 1 and {MAX_LINE_QUANTITY}, got {quantity}"
            )));
        }
        let mut state = self.state();
        let item = state
            .cart_items
            .iter_mut()
            .find(|item| item.cart_id == cart_id && item.id == item_id)
            .ok_or_else(|| DomainError::not_found("cart item", item_id))?;
        item.quantity = quantity;
        state.touch_cart(cart_id, now)
    }

    async fn remove_item(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        let before = state.cart_items.len();
        state
            .cart_items
            .retain(|item| !(item.cart_id == cart_id && item.id == item_id));
        if state.cart_items.len() == before {
            return Err(DomainError::not_found("cart item", item_id));
        }
        state.touch_cart(cart_id, now)
    }

    async fn clear_cart(&self, cart_id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut state = self.state();
        state.cart_row_mut(cart_id)?;
        state.cart_items.retain(|item| item.cart_id != cart_id);
        state.touch_cart(cart_id, now)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn place_orders(&self, placement: &OrderPlacement) -> Result<(), DomainError> {
        let mut state = self.state();
        let cart_id = placement.cart_id;
        let version = state.cart_row_mut(cart_id)?.version;
        if version != placement.expected_cart_version {
            return Err(DomainError::ConcurrencyConflict {
                entity: "cart",
                id: cart_id,
            });
        }
        for item in placement.orders.iter().flat_map(|o| &o.items) {
            let Some(product_id) = item.product_id else {
                continue;
            };
            match state.products.get(&product_id) {
                None => return Err(DomainError::ProductUnavailable(product_id)),
                Some(product) if product.price != item.price_at_order_time => {
                    return Err(DomainError::ConcurrencyConflict {
                        entity: "product",
                        id: product_id,
                    });
                }
                Some(_) => {}
            }
        }

        state.orders.extend(placement.orders.iter().cloned());
        state.cart_items.retain(|item| item.cart_id != cart_id);
        let now = placement
            .orders
            .first()
            .map_or_else(Utc::now, |o| o.order_date);
        state.touch_cart(cart_id, now)
    }

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.state().orders.iter().find(|o| o.id == order_id).cloned())
    }

    async fn list_orders_for_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        Ok(self.state().orders_where(|o| o.buyer_id == buyer_id))
    }

    async fn list_orders_for_seller(&self, seller_id: Uuid) -> Result<Vec<Order>, DomainError> {
        Ok(self.state().orders_where(|o| o.seller_id == seller_id))
    }

    async fn update_order_status(
        &self,
        order_id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        if order.status != expected {
            return Err(DomainError::ConcurrencyConflict {
                entity: "order",
                id: order_id,
            });
        }
        order.status = next;
        Ok(())
    }
}

#[async_trait]
impl RatingRepository for InMemoryStore {
    async fn insert_rating(&self, rating: &Rating) -> Result<(), DomainError> {
        let mut state = self.state();
        if state.ratings.iter().any(|r| r.order_id == rating.order_id) {
            return Err(DomainError::Validation(format!(
                "order {} has already been rated",
                rating.order_id
            )));
        }
        state.ratings.push(rating.clone());
        Ok(())
    }

    async fn find_rating_for_order(&self, order_id: Uuid) -> Result<Option<Rating>, DomainError> {
        Ok(self
            .state()
            .ratings
            .iter()
            .find(|r| r.order_id == order_id)
            .cloned())
    }

    async fn recompute_product_rating(
        &self,
        product_id: Uuid,
        summarize: StarsSummarizer,
    ) -> Result<RatingSummary, DomainError> {
        let mut state = self.state();
        let stars: Vec<i32> = state
            .ratings
            .iter()
            .filter(|r| r.product_id == product_id)
            .map(|r| r.stars)
            .collect();
        let product = state
            .products
            .get_mut(&product_id)
            .ok_or_else(|| DomainError::not_found("product", product_id))?;
        let summary = summarize(&stars);
        product.rating = summary.rating;
        product.total_ratings = summary.total_ratings;
        Ok(summary)
    }
}

#[async_trait]
impl CouponRepository for InMemoryStore {
    async fn insert_coupon(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let mut state = self.state();
        if state.coupons.contains_key(&coupon.code) {
            return Err(DomainError::Validation(format!(
                "coupon code {} already exists",
                coupon.code
            )));
        }
        state.coupons.insert(coupon.code.clone(), coupon.clone());
        Ok(())
    }

    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, DomainError> {
        Ok(self.state().coupons.get(code).cloned())
    }
}

/// A store whose every call fails with an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStore;

fn unavailable<T>() -> Result<T, DomainError> {
    Err(DomainError::Infrastructure("connection refused".into()))
}

#[async_trait]
impl AccountRepository for FailingStore {
    async fn insert_account(&self, _account: &Account) -> Result<(), DomainError> {
        unavailable()
    }

    async fn find_account(&self, _account_id: Uuid) -> Result<Option<Account>, DomainError> {
        unavailable()
    }

    async fn record_verification(
        &self,
        _verification: &AdminVerification,
    ) -> Result<(), DomainError> {
        unavailable()
    }
}

#[async_trait]
impl ProductRepository for FailingStore {
    async fn insert_product(&self, _product: &Product) -> Result<(), DomainError> {
        unavailable()
    }

    async fn find_product(&self, _product_id: Uuid) -> Result<Option<Product>, DomainError> {
        unavailable()
    }

    async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        unavailable()
    }

    async fn update_price(
        &self,
        _product_id: Uuid,
        _price: Decimal,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        unavailable()
    }
}

#[async_trait]
impl CartRepository for FailingStore {
    async fn find_cart(&self, _buyer_id: Uuid) -> Result<Option<Cart>, DomainError> {
        unavailable()
    }

    async fn ensure_cart(
        &self,
        _buyer_id: Uuid,
        _now: DateTime<Utc>,
    ) -> Result<Cart, DomainError> {
        unavailable()
    }

    async fn add_item(
        &self,
        _cart_id: Uuid,
        _product_id: Uuid,
        _quantity: i32,
        _now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        unavailable()
    }

    async fn set_item_quantity(
        &self,
        _cart_id: Uuid,
        _item_id: Uuid,
        _quantity: i32,
        _now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        unavailable()
    }

    async fn remove_item(
        &self,
        _cart_id: Uuid,
        _item_id: Uuid,
        _now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        unavailable()
    }

    async fn clear_cart(&self, _cart_id: Uuid, _now: DateTime<Utc>) -> Result<(), DomainError> {
        unavailable()
    }
}

#[async_trait]
impl OrderRepository for FailingStore {
    async fn place_orders(&self, _placement: &OrderPlacement) -> Result<(), DomainError> {
        unavailable()
    }

    async fn find_order(&self, _order_id: Uuid) -> Result<Option<Order>, DomainError> {
        unavailable()
    }

    async fn list_orders_for_buyer(&self, _buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        unavailable()
    }

    async fn list_orders_for_seller(&self, _seller_id: Uuid) -> Result<Vec<Order>, DomainError> {
        unavailable()
    }

    async fn update_order_status(
        &self,
        _order_id: Uuid,
        _expected: OrderStatus,
        _next: OrderStatus,
    ) -> Result<(), DomainError> {
        unavailable()
    }
}

#[async_trait]
impl RatingRepository for FailingStore {
    async fn insert_rating(&self, _rating: &Rating) -> Result<(), DomainError> {
        unavailable()
    }

    async fn find_rating_for_order(
        &self,
        _order_id: Uuid,
    ) -> Result<Option<Rating>, DomainError> {
        unavailable()
    }

    async fn recompute_product_rating(
        &self,
        _product_id: Uuid,
        _summarize: StarsSummarizer,
    ) -> Result<RatingSummary, DomainError> {
        unavailable()
    }
}

#[async_trait]
impl CouponRepository for FailingStore {
    async fn insert_coupon(&self, _coupon: &Coupon) -> Result<(), DomainError> {
        unavailable()
    }

    async fn find_coupon(&self, _code: &str) -> Result<Option<Coupon>, DomainError> {
        unavailable()
    }
}
