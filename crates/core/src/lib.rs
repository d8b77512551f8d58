//! Stockroom Core - Shared domain types.
//!
//! This crate provides the types shared by every Stockroom component:
//! - `admin` - The inventory HTTP API and seed routine
//! - `cli` - Command-line tools for migrations, seeding and accounts
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. Database encoding for the newtypes is available behind the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, usernames, emails, prices, money and stock levels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
