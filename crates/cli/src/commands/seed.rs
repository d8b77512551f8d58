//! Seed the database with the admin account and sample catalogue.
//!
//! Safe to run repeatedly: rows that already exist (matched by username or
//! name) are left alone.

use secrecy::SecretString;

use stockroom_admin::seed::{self, SeedOptions};

use super::{CommandError, connect};

/// Run the seed routine and log what it did.
pub async fn run(admin_password: SecretString) -> Result<(), CommandError> {
    let pool = connect().await?;

    let report = seed::run(&pool, &SeedOptions { admin_password }).await?;

    tracing::info!(
        accounts_created = report.accounts.created,
        categories_created = report.categories.created,
        suppliers_created = report.suppliers.created,
        items_created = report.items.created,
        "Database seeded successfully"
    );
    Ok(())
}
