//! Integration tests for Stockroom.
//!
//! Each test gets a freshly migrated, truncated and seeded database plus an
//! in-process admin server on a random port.
//!
//! # Running Tests
//!
//! ```bash
//! export TEST_DATABASE_URL=postgres://localhost/stockroom_test
//! cargo test -p stockroom-integration-tests -- --ignored
//! ```
//!
//! The database is shared, so tests in one binary take [`TestContext`] in
//! turn.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};

use stockroom_admin::config::AdminConfig;
use stockroom_admin::db::MIGRATOR;
use stockroom_admin::middleware::create_session_store;
use stockroom_admin::routes;
use stockroom_admin::seed::{self, ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD, SeedOptions};
use stockroom_admin::state::AppState;

static DATABASE: Mutex<()> = Mutex::const_new(());

fn database_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/stockroom_test".to_owned())
}

/// A seeded database and a running server.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
    _lock: MutexGuard<'static, ()>,
}

impl TestContext {
    /// Reset the database, seed it and start a server.
    pub async fn new() -> Self {
        let lock = DATABASE.lock().await;

        let url = database_url();
        let pool = PgPool::connect(&url)
            .await
            .expect("Failed to connect to test database");
        MIGRATOR.run(&pool).await.expect("Failed to run migrations");
        sqlx::query(
            "TRUNCATE inventory.item, inventory.category, inventory.supplier, \
             inventory.account, inventory.session RESTART IDENTITY CASCADE",
        )
        .execute(&pool)
        .await
        .expect("Failed to truncate tables");
        seed::run(&pool, &SeedOptions::default())
            .await
            .expect("Failed to seed database");

        let config = AdminConfig::from_source(|key| {
            (key == "STOCKROOM_DATABASE_URL").then(|| url.clone())
        })
        .expect("Failed to build config");
        let store = create_session_store(&pool).expect("Failed to create session store");
        let app = routes::app(AppState::new(config, pool.clone()), store);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            pool,
            _lock: lock,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in as the seeded administrator.
    pub async fn login(&self) {
        let (status, _) = self
            .login_as(ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
            .await;
        assert_eq!(status, StatusCode::OK, "admin login failed");
    }

    pub async fn login_as(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/auth/login",
            Some(&serde_json::json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(Method::GET, path, None).await
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> (StatusCode, Value) {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.expect("Request failed");
        let status = response.status();
        let bytes = response.bytes().await.expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Id of the first row named `name` in `table` (schema `inventory`).
    pub async fn id_of(&self, table: &str, name: &str) -> i32 {
        sqlx::query_scalar(&format!(
            "SELECT id FROM inventory.{table} WHERE name = $1 ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .expect("Row not found")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM inventory.{table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Count failed")
    }
}
