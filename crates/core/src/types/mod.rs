//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for inventory domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod price;
pub mod stock;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::Money;
pub use price::{Price, PriceError};
pub use stock::{DEFAULT_THRESHOLD, StockError, StockLevel};
pub use username::{Username, UsernameError};
