//! Stockroom Admin library.
//!
//! The inventory API as a library, so the binary, the CLI and the
//! integration tests share one router, one set of repositories and one
//! seed routine.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - Repositories over the `inventory` schema
//! - [`routes`] - Axum handlers and the served application
//! - [`seed`] - Idempotent sample data

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
