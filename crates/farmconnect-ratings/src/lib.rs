//! Farm Connect: Ratings bounded context.
//!
//! Stores buyer ratings and keeps each product's `rating` and
//! `total_ratings` in line with the ratings stored for it. This context is
//! the only writer of those two product fields.

pub mod application;
pub mod domain;
