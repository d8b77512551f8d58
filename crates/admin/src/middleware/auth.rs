//! Authentication extractors.
//!
//! Reads are public; handlers that write take [`RequireAuth`] as their first
//! argument so unauthenticated requests are rejected with 401 before the body
//! is parsed. A session store failure is a 500, not a 401.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::error::{AppError, set_sentry_user};
use crate::models::{CurrentAccount, session_keys};

/// Extractor that requires an authenticated account.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(account): RequireAuth) -> String {
///     format!("Hello, {}!", account.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentAccount);

/// Rejection returned by [`RequireAuth`].
#[derive(Debug)]
pub enum AuthRejection {
    /// No account is logged in.
    Unauthorized,
    /// The session store could not be read.
    Session(tower_sessions::session::Error),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication credentials were not provided." })),
            )
                .into_response(),
            Self::Session(err) => {
                AppError::Internal(format!("Failed to load session: {err}")).into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let account = logged_in(session.get(session_keys::CURRENT_ACCOUNT).await)?;
        set_sentry_user(account.id.as_i32(), &account.username);

        Ok(Self(account))
    }
}

/// Resolve a session lookup: store errors become `Session`, no account `Unauthorized`.
fn logged_in(
    loaded: Result<Option<CurrentAccount>, tower_sessions::session::Error>,
) -> Result<CurrentAccount, AuthRejection> {
    loaded
        .map_err(AuthRejection::Session)?
        .ok_or(AuthRejection::Unauthorized)
}

/// Store the logged-in account in the session.
///
/// The session ID is cycled first so a pre-login ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_account(
    session: &Session,
    account: &CurrentAccount,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ACCOUNT, account).await
}

/// Clear the logged-in account (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_account(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stockroom_core::AccountId;
    use tower_sessions::session_store;

    use super::*;

    fn account() -> CurrentAccount {
        CurrentAccount {
            id: AccountId::new(1),
            username: "admin".to_owned(),
        }
    }

    fn store_down() -> tower_sessions::session::Error {
        tower_sessions::session::Error::Store(session_store::Error::Backend(
            "connection refused".to_owned(),
        ))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_logged_in_account_is_returned() {
        let found = logged_in(Ok(Some(account()))).unwrap();
        assert_eq!(found.id, AccountId::new(1));
    }

    #[tokio::test]
    async fn test_empty_session_is_unauthorized() {
        let rejection = logged_in(Ok(None)).unwrap_err();
        assert!(matches!(rejection, AuthRejection::Unauthorized));

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Authentication credentials were not provided.");
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let rejection = logged_in(Err(store_down())).unwrap_err();
        assert!(matches!(rejection, AuthRejection::Session(_)));

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
    }
}
