//! System-wide summary and health checks.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::db::SummaryRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::SystemSummary;
use crate::state::AppState;

/// Build the system router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/system-summary/", get(system_summary))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Counts across the whole inventory. Authenticated accounts only.
///
/// GET /system-summary/
async fn system_summary(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<SystemSummary>, AppError> {
    let summary = SummaryRepository::new(state.pool()).system().await?;
    Ok(Json(summary))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
