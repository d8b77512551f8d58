//! Category repository for database operations.
//!
//! Every read joins the creating account so `created_by` can be rendered as
//! a username.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{AccountId, CategoryId};

use super::{RepositoryError, map_write_error};
use crate::models::{Category, CategoryInput};

const SELECT_CATEGORY: &str = "SELECT c.id, c.name, c.description, c.created_by AS created_by_id, \
                               a.username AS created_by, c.created_at, c.updated_at";

const JOIN_ACCOUNT: &str = "JOIN inventory.account a ON a.id = c.created_by";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: Option<String>,
    created_by_id: i32,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            created_by: row.created_by,
            created_by_id: AccountId::new(row.created_by_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every category ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "{SELECT_CATEGORY} FROM inventory.category c {JOIN_ACCOUNT} ORDER BY c.id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "{SELECT_CATEGORY} FROM inventory.category c {JOIN_ACCOUNT} WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Create a category attributed to `created_by`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if the account no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        input: &CategoryInput,
        created_by: AccountId,
    ) -> Result<Category, RepositoryError> {
        create_with(self.pool, input, created_by).await
    }

    /// Replace every writable field of a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r"
            WITH c AS (
                UPDATE inventory.category
                SET name = $2, description = $3, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {SELECT_CATEGORY} FROM c {JOIN_ACCOUNT}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.description.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(Category::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category and, through the foreign key cascade, its items.
    ///
    /// Returns the number of items removed along with the category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CategoryId) -> Result<i64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory.item WHERE category_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM inventory.category WHERE id = $1")
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
    input: &CategoryInput,
    created_by: AccountId,
) -> Result<Category, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        r"
        WITH c AS (
            INSERT INTO inventory.category (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING *
        )
        {SELECT_CATEGORY} FROM c {JOIN_ACCOUNT}
        "
    ))
    .bind(&input.name)
    .bind(input.description.as_deref())
    .bind(created_by)
    .fetch_one(executor)
    .await
    .map_err(map_write_error)?;

    Ok(Category::from(row))
}

/// First category with exactly this name, if any.
pub(crate) async fn find_by_name_with<'e, E>(
    executor: E,
    name: &str,
) -> Result<Option<Category>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        "{SELECT_CATEGORY} FROM inventory.category c {JOIN_ACCOUNT} \
         WHERE c.name = $1 ORDER BY c.id LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Category::from))
}
