//! Domain layer for the Ratings context.

pub mod aggregate;
pub mod commands;
pub mod rating;
