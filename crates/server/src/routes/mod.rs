//! API route handlers
//!
//! - `health`: liveness and readiness probes
//! - `users`: CRUD over the user collection

pub mod health;
pub mod users;

use crate::error::ServerError;
use axum::BoxError;
use tower::timeout::error::Elapsed;

/// Root smoke check (GET /).
pub async fn hello() -> &'static str {
    "Hello, world!"
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

/// 405 handler for known paths hit with an unsupported method
pub async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}

/// Convert errors from the whole-request timeout layer into JSON responses
pub async fn handle_middleware_error(err: BoxError) -> ServerError {
    if err.is::<Elapsed>() {
        ServerError::Timeout
    } else {
        ServerError::Internal(err.to_string())
    }
}
