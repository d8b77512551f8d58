//! Account repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{AccountId, Email, Username};

use super::RepositoryError;
use crate::models::{Account, NewAccount};

const ACCOUNT_COLUMNS: &str = "id, username, email, phone_number, position, is_staff, \
                               is_superuser, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    username: String,
    email: String,
    phone_number: Option<String>,
    position: Option<String>,
    is_staff: bool,
    is_superuser: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct AccountWithPasswordRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password_hash: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AccountId::new(row.id),
            username,
            email,
            phone_number: row.phone_number,
            position: row.position,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM inventory.account WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    /// Get an account together with its password hash, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_with_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountWithPasswordRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS}, password_hash FROM inventory.account WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Account::try_from(r.account).map(|account| (account, r.password_hash)))
            .transpose()
    }

    /// Create a new account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        account: &NewAccount,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        create_with(self.pool, account, password_hash).await
    }
}

/// Insert an account on any executor, so the seed routine can run it inside
/// its transaction.
pub(crate) async fn create_with<'e, E>(
    executor: E,
    account: &NewAccount,
    password_hash: &str,
) -> Result<Account, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        r"
        INSERT INTO inventory.account
            (username, email, password_hash, phone_number, position, is_staff, is_superuser)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {ACCOUNT_COLUMNS}
        "
    ))
    .bind(account.username.as_str())
    .bind(account.email.as_str())
    .bind(password_hash)
    .bind(account.phone_number.as_deref())
    .bind(account.position.as_deref())
    .bind(account.is_staff)
    .bind(account.is_superuser)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("username already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    Account::try_from(row)
}

/// Look up an account by username on any executor.
pub(crate) async fn find_by_username_with<'e, E>(
    executor: E,
    username: &Username,
) -> Result<Option<Account>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM inventory.account WHERE username = $1"
    ))
    .bind(username.as_str())
    .fetch_optional(executor)
    .await?;

    row.map(Account::try_from).transpose()
}
