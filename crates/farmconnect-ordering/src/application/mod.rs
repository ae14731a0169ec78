//! Application layer for the Ordering context.

pub mod command_handlers;
pub mod query_handlers;
