//! Session layer configuration.
//!
//! Sessions are stored in `inventory.session` through tower-sessions'
//! `PostgreSQL` store, with SameSite=Strict HTTP-only cookies that expire
//! after a period of inactivity.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "stockroom_session";

/// Schema holding the session table.
const SESSION_SCHEMA: &str = "inventory";
/// Session table, created by migration.
const SESSION_TABLE: &str = "session";

/// Errors building the session store.
#[derive(Debug, thiserror::Error)]
#[error("invalid session store identifier: {0}")]
pub struct SessionStoreError(String);

/// Create the `PostgreSQL`-backed session store.
///
/// # Errors
///
/// Returns an error if the schema or table name is rejected by the store.
pub fn create_session_store(pool: &PgPool) -> Result<PostgresStore, SessionStoreError> {
    PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA)
        .map_err(|e| SessionStoreError(e.to_string()))?
        .with_table_name(SESSION_TABLE)
        .map_err(|e| SessionStoreError(e.to_string()))
}

/// Wrap a session store in a layer configured from `config`.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &AdminConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::hours(config.session_expiry_hours),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
