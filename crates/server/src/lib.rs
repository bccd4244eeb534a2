//! Freshkeep server library.
//!
//! Household grocery-expiration tracking over GraphQL. The binary in
//! `main.rs` wires configuration, logging and Sentry around [`routes::router`];
//! everything else lives here so it can be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
