//! Account authentication service.
//!
//! Username/password login against Argon2id hashes. Session handling lives in
//! [`crate::middleware`]; this module only checks credentials and creates
//! accounts.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use stockroom_core::{Email, Username};

use crate::db::{AccountRepository, RepositoryError};
use crate::models::{Account, NewAccount};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Details for a new account, before validation.
#[derive(Debug)]
pub struct AccountSignup<'s> {
    pub username: &'s str,
    pub email: &'s str,
    pub password: &'s SecretString,
    pub phone_number: Option<String>,
    pub position: Option<String>,
    pub is_superuser: bool,
}

/// Authentication service.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (account, password_hash) = self
            .accounts
            .get_with_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(account)
    }

    /// Create a staff account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the username is taken, or a
    /// validation error for a bad username, email or password.
    pub async fn create_account(&self, signup: AccountSignup<'_>) -> Result<Account, AuthError> {
        let account = NewAccount {
            username: Username::parse(signup.username)?,
            email: Email::parse(signup.email)?,
            phone_number: signup.phone_number,
            position: signup.position,
            is_staff: true,
            is_superuser: signup.is_superuser,
        };

        validate_password(signup.password.expose_secret())?;
        let password_hash = hash_password(signup.password.expose_secret())?;

        self.accounts
            .create(&account, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`].
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
