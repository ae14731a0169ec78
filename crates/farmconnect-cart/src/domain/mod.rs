//! Domain layer for the Cart context.

pub mod cart;
pub mod commands;
