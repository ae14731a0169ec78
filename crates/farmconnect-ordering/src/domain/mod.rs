//! Domain layer for the Ordering context.

pub mod checkout;
pub mod commands;
pub mod status;
