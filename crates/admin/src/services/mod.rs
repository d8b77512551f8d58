//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Username/password authentication and account creation

pub mod auth;

pub use auth::{AccountSignup, AuthError, AuthService};
