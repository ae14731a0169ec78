//! Farm Connect: Catalog bounded context.
//!
//! Responsible for seller product listings, price changes and discount
//! coupons. Product rating fields are owned by the ratings context and are
//! never written here.

pub mod application;
pub mod domain;
