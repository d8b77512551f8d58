//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (recorded on the span, echoed on the response)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. [`RequireAuth`] extractor on write handlers

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, clear_current_account, set_current_account};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer, create_session_store};
