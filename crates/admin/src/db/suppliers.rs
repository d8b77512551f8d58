//! Supplier repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{AccountId, Email, SupplierId};

use super::{RepositoryError, map_write_error};
use crate::models::{Supplier, SupplierInput};

const SELECT_SUPPLIER: &str = "SELECT s.id, s.name, s.contact_person, s.email, s.phone, \
                               s.address, s.created_by AS created_by_id, \
                               a.username AS created_by, s.created_at, s.updated_at";

const JOIN_ACCOUNT: &str = "JOIN inventory.account a ON a.id = s.created_by";

#[derive(sqlx::FromRow)]
struct SupplierRow {
    id: i32,
    name: String,
    contact_person: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    created_by_id: i32,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SupplierRow> for Supplier {
    type Error = RepositoryError;

    fn try_from(row: SupplierRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid supplier email in database: {e}"))
            })?;

        Ok(Self {
            id: SupplierId::new(row.id),
            name: row.name,
            contact_person: row.contact_person,
            email,
            phone: row.phone,
            address: row.address,
            created_by: row.created_by,
            created_by_id: AccountId::new(row.created_by_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for supplier database operations.
pub struct SupplierRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SupplierRepository<'a> {
    /// Create a new supplier repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every supplier ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list(&self) -> Result<Vec<Supplier>, RepositoryError> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "{SELECT_SUPPLIER} FROM inventory.supplier s {JOIN_ACCOUNT} ORDER BY s.id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Supplier::try_from).collect()
    }

    /// Get a supplier by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get(&self, id: SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "{SELECT_SUPPLIER} FROM inventory.supplier s {JOIN_ACCOUNT} WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Supplier::try_from).transpose()
    }

    /// Create a supplier attributed to `created_by`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if the account no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        input: &SupplierInput,
        created_by: AccountId,
    ) -> Result<Supplier, RepositoryError> {
        create_with(self.pool, input, created_by).await
    }

    /// Replace every writable field of a supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the supplier does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: SupplierId,
        input: &SupplierInput,
    ) -> Result<Supplier, RepositoryError> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r"
            WITH s AS (
                UPDATE inventory.supplier
                SET name = $2, contact_person = $3, email = $4, phone = $5, address = $6,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {SELECT_SUPPLIER} FROM s {JOIN_ACCOUNT}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.contact_person.as_deref())
        .bind(input.email.as_ref().map(Email::as_str))
        .bind(input.phone.as_deref())
        .bind(input.address.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(Supplier::try_from)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a supplier and, through the foreign key cascade, its items.
    ///
    /// Returns the number of items removed along with the supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the supplier does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: SupplierId) -> Result<i64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory.item WHERE supplier_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM inventory.supplier WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(items)
    }
}

pub(crate) async fn create_with<'e, E>(
    executor: E,
    input: &SupplierInput,
    created_by: AccountId,
) -> Result<Supplier, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, SupplierRow>(&format!(
        r"
        WITH s AS (
            INSERT INTO inventory.supplier
                (name, contact_person, email, phone, address, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
        )
        {SELECT_SUPPLIER} FROM s {JOIN_ACCOUNT}
        "
    ))
    .bind(&input.name)
    .bind(input.contact_person.as_deref())
    .bind(input.email.as_ref().map(Email::as_str))
    .bind(input.phone.as_deref())
    .bind(input.address.as_deref())
    .bind(created_by)
    .fetch_one(executor)
    .await
    .map_err(map_write_error)?;

    Supplier::try_from(row)
}

/// First supplier with exactly this name, if any.
pub(crate) async fn find_by_name_with<'e, E>(
    executor: E,
    name: &str,
) -> Result<Option<Supplier>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, SupplierRow>(&format!(
        "{SELECT_SUPPLIER} FROM inventory.supplier s {JOIN_ACCOUNT} \
         WHERE s.name = $1 ORDER BY s.id LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(executor)
    .await?;

    row.map(Supplier::try_from).transpose()
}
