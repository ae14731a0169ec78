//! Domain layer for the Accounts context.

pub mod account;
pub mod commands;
