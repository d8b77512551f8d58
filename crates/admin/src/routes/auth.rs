//! Authentication route handlers.
//!
//! Login stores the account in the session; the session cookie then
//! authenticates write requests.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::AccountRepository;
use crate::error::{AppError, clear_sentry_user};
use crate::middleware::{RequireAuth, clear_current_account, set_current_account};
use crate::models::{Account, CurrentAccount};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Log in with username and password.
///
/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(request) = payload?;

    let account = AuthService::new(state.pool())
        .login(&request.username, &request.password)
        .await
        .inspect_err(|e| {
            if matches!(e, AuthError::InvalidCredentials) {
                tracing::warn!(username = %request.username, "Failed login attempt");
            }
        })?;

    set_current_account(&session, &CurrentAccount::from(&account))
        .await
        .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;

    tracing::info!(account_id = %account.id, username = %account.username, "Account logged in");
    Ok(Json(account))
}

/// Log out and clear the session.
///
/// POST /auth/logout
async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_account(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in account.
///
/// GET /auth/me
async fn me(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Account>, AppError> {
    let account = AccountRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;
    Ok(Json(account))
}
