//! Farm Connect: Cart bounded context.
//!
//! Each buyer owns exactly one cart, created on first access and emptied
//! (never deleted) by checkout.

pub mod application;
pub mod domain;
