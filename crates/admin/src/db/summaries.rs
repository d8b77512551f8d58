//! Aggregate queries over the inventory.
//!
//! All arithmetic happens in `PostgreSQL`. Monetary results are cast to
//! `NUMERIC(20, 2)` and coalesced to zero so empty groups still decode;
//! `Money` restores the two places the wire format drops for zero.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{CategorySummary, StockSummary, SupplierSummary, SystemSummary};

/// Repository for summary queries.
pub struct SummaryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SummaryRepository<'a> {
    /// Create a new summary repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Item count, stock value and average price for every category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<CategorySummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategorySummary>(
            r"
            SELECT c.id,
                   c.name,
                   COUNT(i.id) AS item_count,
                   COALESCE(SUM(i.price * i.stock_quantity), 0)::NUMERIC(20, 2)
                       AS total_stock_value,
                   COALESCE(ROUND(AVG(i.price), 2), 0)::NUMERIC(20, 2) AS avg_price
            FROM inventory.category c
            LEFT JOIN inventory.item i ON i.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY c.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Item count and stock value for every supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn suppliers(&self) -> Result<Vec<SupplierSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, SupplierSummary>(
            r"
            SELECT s.id,
                   s.name,
                   COUNT(i.id) AS item_count,
                   COALESCE(SUM(i.price * i.stock_quantity), 0)::NUMERIC(20, 2)
                       AS total_stock_value
            FROM inventory.supplier s
            LEFT JOIN inventory.item i ON i.supplier_id = s.id
            GROUP BY s.id, s.name
            ORDER BY s.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Totals over every item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stock(&self) -> Result<StockSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, StockSummary>(
            r"
            SELECT COUNT(*) AS total_items,
                   COALESCE(SUM(stock_quantity), 0)::BIGINT AS total_stock,
                   COALESCE(SUM(price * stock_quantity), 0)::NUMERIC(20, 2) AS total_value,
                   COALESCE(ROUND(AVG(price), 2), 0)::NUMERIC(20, 2) AS avg_price
            FROM inventory.item
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// Whole-system counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn system(&self) -> Result<SystemSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, SystemSummary>(
            r"
            SELECT (SELECT COUNT(*) FROM inventory.item) AS total_items,
                   (SELECT COUNT(*) FROM inventory.category) AS total_categories,
                   (SELECT COUNT(*) FROM inventory.supplier) AS total_suppliers,
                   (SELECT COALESCE(SUM(stock_quantity), 0)::BIGINT FROM inventory.item)
                       AS total_stock,
                   (SELECT COALESCE(SUM(price * stock_quantity), 0)::NUMERIC(20, 2)
                    FROM inventory.item) AS total_stock_value
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }
}
