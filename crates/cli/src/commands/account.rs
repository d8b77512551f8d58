//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! STOCKROOM_ACCOUNT_PASSWORD=... sr-cli account create -u jdoe -e jdoe@example.com
//! ```
//!
//! The password comes from the environment so it never lands in shell
//! history.

use secrecy::SecretString;

use stockroom_admin::services::{AccountSignup, AuthService};

use super::{CommandError, connect};

const PASSWORD_VAR: &str = "STOCKROOM_ACCOUNT_PASSWORD";

/// Create a staff account.
pub async fn create(
    username: &str,
    email: &str,
    phone_number: Option<String>,
    position: Option<String>,
    is_superuser: bool,
) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();
    let password = std::env::var(PASSWORD_VAR)
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar(PASSWORD_VAR))?;

    let pool = connect().await?;

    tracing::info!("Creating account: {username}");
    let account = AuthService::new(&pool)
        .create_account(AccountSignup {
            username,
            email,
            password: &password,
            phone_number,
            position,
            is_superuser,
        })
        .await?;

    tracing::info!(
        "Account created successfully! ID: {}, Username: {}, Superuser: {}",
        account.id,
        account.username,
        account.is_superuser
    );
    Ok(())
}
