//! Account domain types.
//!
//! Accounts are the administrative users that own every other record. The
//! password hash never leaves the repository layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::{AccountId, Email, Username};

/// Maximum length of an account phone number.
pub const PHONE_MAX_LEN: usize = 20;
/// Maximum length of an account position/title.
pub const POSITION_MAX_LEN: usize = 100;

/// An administrative account.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Login name.
    pub username: Username,
    /// Contact email.
    pub email: Email,
    /// Optional phone number.
    pub phone_number: Option<String>,
    /// Optional job title.
    pub position: Option<String>,
    /// Whether the account may use the admin console.
    pub is_staff: bool,
    /// Whether the account holds every permission.
    pub is_superuser: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating an account. The password is hashed before it gets here.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub email: Email,
    pub phone_number: Option<String>,
    pub position: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}
