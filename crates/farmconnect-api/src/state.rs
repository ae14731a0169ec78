//! Shared application state.

use std::sync::Arc;

use farmconnect_core::clock::Clock;
use farmconnect_core::repository::{
    AccountRepository, CartRepository, CouponRepository, MarketStore, OrderRepository,
    ProductRepository, RatingRepository,
};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for timestamps.
    pub clock: Arc<dyn Clock>,
    /// Account persistence.
    pub accounts: Arc<dyn AccountRepository>,
    /// Product persistence.
    pub products: Arc<dyn ProductRepository>,
    /// Cart persistence.
    pub carts: Arc<dyn CartRepository>,
    /// Order persistence.
    pub orders: Arc<dyn OrderRepository>,
    /// Rating persistence.
    pub ratings: Arc<dyn RatingRepository>,
    /// Coupon persistence.
    pub coupons: Arc<dyn CouponRepository>,
}

impl AppState {
    /// Create new application state with every repository served by `store`.
    #[must_use]
    pub fn new<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        S: MarketStore + 'static,
    {
        Self {
            clock,
            accounts: store.clone(),
            products: store.clone(),
            carts: store.clone(),
            orders: store.clone(),
            ratings: store.clone(),
            coupons: store,
        }
    }
}
