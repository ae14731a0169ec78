//! Domain layer for the Catalog context.

pub mod commands;
pub mod coupon;
pub mod product;
