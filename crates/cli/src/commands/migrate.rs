//! Database migration command.
//!
//! Applies the migrations embedded in `stockroom-admin`
//! (`crates/admin/migrations/`): the `inventory` schema tables and the
//! session table.

use stockroom_admin::db::MIGRATOR;

use super::{CommandError, connect};

/// Run all pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running inventory migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
