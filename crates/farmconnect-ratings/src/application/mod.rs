//! Application layer for the Ratings context.

pub mod command_handlers;
