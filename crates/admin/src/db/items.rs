//! Item repository for database operations.
//!
//! Reads join the category, supplier and creating account to fill in the
//! denormalized names. `stock_value` is derived from the decoded price.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{AccountId, CategoryId, ItemId, Price, StockLevel, SupplierId};

use super::{RepositoryError, map_write_error};
use crate::models::{Item, ItemInput};

const SELECT_ITEM: &str = "SELECT i.id, i.name, i.description, i.category_id, \
                           c.name AS category_name, i.supplier_id, s.name AS supplier_name, \
                           i.price, i.stock_quantity, i.threshold, \
                           i.created_by AS created_by_id, a.username AS created_by, \
                           i.created_at, i.updated_at";

const JOINS: &str = "JOIN inventory.category c ON c.id = i.category_id \
                     JOIN inventory.supplier s ON s.id = i.supplier_id \
                     JOIN inventory.account a ON a.id = i.created_by";

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i32,
    name: String,
    description: Option<String>,
    category_id: i32,
    category_name: String,
    supplier_id: i32,
    supplier_name: String,
    price: Price,
    stock_quantity: i32,
    threshold: i32,
    created_by_id: i32,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let stock = StockLevel::new(row.stock_quantity, row.threshold).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid stock level for item {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ItemId::new(row.id),
            name: row.name,
            description: row.description,
            category: CategoryId::new(row.category_id),
            category_name: row.category_name,
            supplier: SupplierId::new(row.supplier_id),
            supplier_name: row.supplier_name,
            price: row.price,
            stock_quantity: stock.quantity(),
            threshold: stock.threshold(),
            stock_value: row.price.stock_value(stock.quantity()),
            created_by: row.created_by,
            created_by_id: AccountId::new(row.created_by_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_items(rows: Vec<ItemRow>) -> Result<Vec<Item>, RepositoryError> {
    rows.into_iter().map(Item::try_from).collect()
}

/// Repository for item database operations.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every item ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{SELECT_ITEM} FROM inventory.item i {JOINS} ORDER BY i.id"
        ))
        .fetch_all(self.pool)
        .await?;

        into_items(rows)
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "{SELECT_ITEM} FROM inventory.item i {JOINS} WHERE i.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Item::try_from).transpose()
    }

    /// Items whose stock is strictly below their reorder threshold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn below_threshold(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{SELECT_ITEM} FROM inventory.item i {JOINS} \
             WHERE i.stock_quantity < i.threshold ORDER BY i.id"
        ))
        .fetch_all(self.pool)
        .await?;

        into_items(rows)
    }

    /// Items in one category. An unknown category yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_category(&self, category: CategoryId) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{SELECT_ITEM} FROM inventory.item i {JOINS} WHERE i.category_id = $1 ORDER BY i.id"
        ))
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        into_items(rows)
    }

    /// Create an item attributed to `created_by`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` naming `category` or `supplier`
    /// when the referenced row does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        input: &ItemInput,
        created_by: AccountId,
    ) -> Result<Item, RepositoryError> {
        create_with(self.pool, input, created_by).await
    }

    /// Replace every writable field of an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist.
    /// Returns `RepositoryError::ForeignKey` for a dangling category or supplier.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: ItemId, input: &ItemInput) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r"
            WITH i AS (
                UPDATE inventory.item
                SET name = $2, description = $3, category_id = $4, supplier_id = $5,
                    price = $6, stock_quantity = $7, threshold = $8, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {SELECT_ITEM} FROM i {JOINS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(input.category)
        .bind(input.supplier)
        .bind(input.price)
        .bind(input.stock.quantity())
        .bind(input.stock.threshold())
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(Item::try_from)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM inventory.item WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

pub(crate) async fn create_with<'e, E>(
    executor: E,
    input: &ItemInput,
    created_by: AccountId,
) -> Result<Item, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        r"
        WITH i AS (
            INSERT INTO inventory.item
                (name, description, category_id, supplier_id, price, stock_quantity,
                 threshold, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        )
        {SELECT_ITEM} FROM i {JOINS}
        "
    ))
    .bind(&input.name)
    .bind(input.description.as_deref())
    .bind(input.category)
    .bind(input.supplier)
    .bind(input.price)
    .bind(input.stock.quantity())
    .bind(input.stock.threshold())
    .bind(created_by)
    .fetch_one(executor)
    .await
    .map_err(map_write_error)?;

    Item::try_from(row)
}

/// First item with exactly this name, if any.
pub(crate) async fn find_by_name_with<'e, E>(
    executor: E,
    name: &str,
) -> Result<Option<Item>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        "{SELECT_ITEM} FROM inventory.item i {JOINS} WHERE i.name = $1 ORDER BY i.id LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(executor)
    .await?;

    row.map(Item::try_from).transpose()
}
