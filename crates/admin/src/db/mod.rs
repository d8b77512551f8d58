//! Database operations for the inventory `PostgreSQL` database.
//!
//! ## Tables (schema `inventory`)
//!
//! - `account` - Administrative users (password hashes live only here)
//! - `category` - Item groupings
//! - `supplier` - Vendors
//! - `item` - Stock-keeping units, cascading from category and supplier
//! - `session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/`, embedded in
//! [`MIGRATOR`] and run via:
//! ```bash
//! cargo run -p stockroom-cli -- migrate
//! ```

pub mod accounts;
pub mod categories;
pub mod items;
pub mod summaries;
pub mod suppliers;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use items::ItemRepository;
pub use summaries::SummaryRepository;
pub use suppliers::SupplierRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A foreign key points at a row that does not exist.
    #[error("{field} references a row that does not exist")]
    ForeignKey {
        /// Request field carrying the dangling reference.
        field: &'static str,
    },

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Translate a failed write into a repository error.
///
/// Foreign-key violations on `item` are reported against the request field
/// that carried the identifier.
pub(crate) fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_foreign_key_violation() {
            let field = match db_err.constraint() {
                Some("item_category_id_fkey") => "category",
                Some("item_supplier_id_fkey") => "supplier",
                _ => "created_by",
            };
            return RepositoryError::ForeignKey { field };
        }
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(db_err.message().to_owned());
        }
    }
    RepositoryError::Database(err)
}
