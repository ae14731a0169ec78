//! Farm Connect Core: shared domain abstractions.
//!
//! This crate defines the records, repository traits and error type that all
//! bounded contexts depend on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod records;
pub mod repository;
