//! Farm Connect: Accounts bounded context.
//!
//! Responsible for registering buyers, sellers and admins and for the admin
//! review that marks an account as verified.

pub mod application;
pub mod domain;
