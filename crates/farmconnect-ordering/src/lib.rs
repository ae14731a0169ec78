//! Farm Connect: Ordering bounded context.
//!
//! Turns a buyer's cart into one order per seller and moves orders through
//! their lifecycle.

pub mod application;
pub mod domain;
