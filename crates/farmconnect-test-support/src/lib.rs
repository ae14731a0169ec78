//! Shared test doubles and fixtures for the Farm Connect marketplace.

mod clock;
pub mod fixtures;
mod store;

pub use clock::FixedClock;
pub use store::{FailingStore, InMemoryStore};
