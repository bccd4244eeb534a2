//! Freshkeep Core - Shared types and business rules.
//!
//! This crate provides the pieces used across all Freshkeep components:
//! - `server` - GraphQL API over the household inventory
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Every rule here takes "today" as an argument so it
//! can be evaluated deterministically in tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails
//! - [`rules`] - Expiration prediction, CO2 accounting, restock and recipe
//!   suggestions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod rules;
pub mod types;

pub use types::*;
