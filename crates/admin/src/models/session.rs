//! Session-related types for account authentication.

use serde::{Deserialize, Serialize};

use stockroom_core::AccountId;

use super::account::Account;

/// Session-stored account identity.
///
/// Minimal data stored in the session to identify the logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAccount {
    /// Account's database ID.
    pub id: AccountId,
    /// Account's login name.
    pub username: String,
}

impl From<&Account> for CurrentAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.as_str().to_owned(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in account.
    pub const CURRENT_ACCOUNT: &str = "current_account";
}
