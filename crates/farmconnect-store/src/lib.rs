//! PostgreSQL-backed store for the Farm Connect marketplace.
//!
//! [`PgStore`] implements every repository trait of `farmconnect-core`.
//! Each trait method runs as a single statement or a single transaction.

mod accounts;
mod carts;
mod catalog;
mod orders;
pub mod pg_store;
mod ratings;
mod rows;
pub mod schema;

pub use pg_store::PgStore;
