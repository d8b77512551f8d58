//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database)
//!
//! # Auth
//! POST /auth/login                  - Username/password login
//! POST /auth/logout                 - Logout
//! GET  /auth/me                     - Current account (auth)
//!
//! # Categories
//! GET  /categories/                 - List
//! POST /categories/                 - Create (auth)
//! GET  /categories/summary/         - Per-category aggregates
//! GET  /categories/{id}/            - Detail
//! PUT  /categories/{id}/            - Full update (auth)
//! PATCH /categories/{id}/           - Partial update (auth)
//! DELETE /categories/{id}/          - Delete with items (auth)
//!
//! # Suppliers
//! (same shape as categories, under /suppliers/)
//!
//! # Items
//! GET  /items/                      - List
//! POST /items/                      - Create (auth)
//! GET  /items/below_threshold/      - Items with stock below threshold
//! GET  /items/by_category/          - Items in ?category_id=
//! GET  /items/stock_summary/        - Totals over all items
//! GET|PUT|PATCH|DELETE /items/{id}/ - Detail and writes (auth for writes)
//!
//! # System
//! GET  /system-summary/             - Whole-system counts (auth)
//! ```

pub mod auth;
pub mod categories;
pub mod items;
pub mod suppliers;
pub mod system;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Build the complete API router (without state or layers).
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(categories::router())
        .merge(suppliers::router())
        .merge(items::router())
        .merge(system::router())
}

/// Build the served application: routes, sessions, request IDs, tracing
/// and Sentry.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config());

    router()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
        .layer(sentry_tower::NewSentryLayer::new_from_top())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::AdminConfig;
    use crate::middleware::REQUEST_ID_HEADER;

    const UNUSED_DB: &str = "postgres://localhost/unused";

    /// The app over a pool that never connects. Only requests rejected
    /// before touching the database can be exercised.
    fn test_app() -> Router {
        let config = AdminConfig::from_source(|key| {
            (key == "STOCKROOM_DATABASE_URL").then(|| UNUSED_DB.to_owned())
        })
        .unwrap();
        let pool = PgPoolOptions::new().connect_lazy(UNUSED_DB).unwrap();
        app(AppState::new(config, pool), MemoryStore::default())
    }

    async fn send(method: Method, uri: &str, body: Option<&str>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_owned())
            }
            None => Body::empty(),
        };
        test_app().oneshot(request.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_system_summary_requires_auth() {
        let response = send(Method::GET, "/system-summary/", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_writes_require_auth() {
        let cases = [
            (Method::POST, "/categories/", Some(r#"{"name": "Toys"}"#)),
            (Method::PUT, "/categories/1/", Some(r#"{"name": "Toys"}"#)),
            (Method::PATCH, "/suppliers/1/", Some(r#"{"phone": null}"#)),
            (Method::DELETE, "/suppliers/1/", None),
            (Method::POST, "/items/", Some("{}")),
            (Method::DELETE, "/items/1/", None),
        ];

        for (method, uri, body) in cases {
            let response = send(method.clone(), uri, body).await;
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_me_requires_auth() {
        let response = send(Method::GET, "/auth/me", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let response = send(Method::POST, "/auth/logout", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_by_category_requires_parameter() {
        for uri in ["/items/by_category/", "/items/by_category/?category_id="] {
            let response = send(Method::GET, uri, None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let json = json_body(response).await;
            assert_eq!(json["error"], "category_id parameter is required");
        }
    }

    #[tokio::test]
    async fn test_by_category_rejects_non_integer() {
        let response = send(Method::GET, "/items/by_category/?category_id=abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Validation failed");
        assert!(json["fields"]["category_id"].is_array());
    }

    #[tokio::test]
    async fn test_malformed_login_body_is_validation_error() {
        let response = send(Method::POST, "/auth/login", Some(r#"{"username": 5}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Validation failed");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = send(Method::GET, "/nope/", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
