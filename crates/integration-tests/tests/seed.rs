//! Integration tests for the seed routine.
//!
//! Requires a `PostgreSQL` database at `TEST_DATABASE_URL`.

use stockroom_admin::seed::{self, SeedOptions, Tally};
use stockroom_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_seed_creates_catalogue() {
    let ctx = TestContext::new().await;

    assert_eq!(ctx.count("account").await, 1);
    assert_eq!(ctx.count("category").await, 4);
    assert_eq!(ctx.count("supplier").await, 3);
    assert_eq!(ctx.count("item").await, 6);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_seed_is_idempotent() {
    let ctx = TestContext::new().await;

    let report = seed::run(&ctx.pool, &SeedOptions::default())
        .await
        .expect("Second seed failed");

    assert_eq!(report.accounts, Tally { created: 0, existing: 1 });
    assert_eq!(report.categories, Tally { created: 0, existing: 4 });
    assert_eq!(report.suppliers, Tally { created: 0, existing: 3 });
    assert_eq!(report.items, Tally { created: 0, existing: 6 });

    assert_eq!(ctx.count("account").await, 1);
    assert_eq!(ctx.count("item").await, 6);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_seed_fills_only_missing_rows() {
    let ctx = TestContext::new().await;

    sqlx::query("DELETE FROM inventory.item WHERE name = 'Notebook'")
        .execute(&ctx.pool)
        .await
        .expect("Delete failed");

    let report = seed::run(&ctx.pool, &SeedOptions::default())
        .await
        .expect("Reseed failed");

    assert_eq!(report.items, Tally { created: 1, existing: 5 });
    assert_eq!(report.categories.created, 0);
    assert_eq!(ctx.count("item").await, 6);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_seeded_admin_can_log_in() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.login_as("admin", "admin123").await;
    assert_eq!(status, 200);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["is_superuser"], true);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_failed_seed_leaves_no_rows() {
    let ctx = TestContext::new().await;

    sqlx::query(
        "TRUNCATE inventory.item, inventory.category, inventory.supplier, \
         inventory.account RESTART IDENTITY CASCADE",
    )
    .execute(&ctx.pool)
    .await
    .expect("Failed to truncate tables");

    // The last seeded item fails after everything else has been written
    sqlx::query(
        r"
        CREATE OR REPLACE FUNCTION inventory.reject_headphones() RETURNS trigger AS $$
        BEGIN
            IF NEW.name = 'Headphones' THEN
                RAISE EXCEPTION 'headphones rejected';
            END IF;
            RETURN NEW;
        END
        $$ LANGUAGE plpgsql
        ",
    )
    .execute(&ctx.pool)
    .await
    .expect("Failed to create trigger function");
    sqlx::query(
        "CREATE TRIGGER reject_headphones BEFORE INSERT ON inventory.item \
         FOR EACH ROW EXECUTE FUNCTION inventory.reject_headphones()",
    )
    .execute(&ctx.pool)
    .await
    .expect("Failed to create trigger");

    let result = seed::run(&ctx.pool, &SeedOptions::default()).await;

    sqlx::query("DROP TRIGGER IF EXISTS reject_headphones ON inventory.item")
        .execute(&ctx.pool)
        .await
        .expect("Failed to drop trigger");
    sqlx::query("DROP FUNCTION IF EXISTS inventory.reject_headphones()")
        .execute(&ctx.pool)
        .await
        .expect("Failed to drop trigger function");

    assert!(result.is_err());
    assert_eq!(ctx.count("account").await, 0);
    assert_eq!(ctx.count("category").await, 0);
    assert_eq!(ctx.count("supplier").await, 0);
    assert_eq!(ctx.count("item").await, 0);
}
