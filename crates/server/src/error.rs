use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use userd::StoreError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid user id: {0}")]
    InvalidId(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request timeout")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Store(err) => match err {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::InvalidId(_) => StatusCode::BAD_REQUEST,
                StoreError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                StoreError::Unavailable(_)
                | StoreError::Decode(_)
                | StoreError::Config(_)
                | StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::InvalidId(_) => "INVALID_ID",
            ServerError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ServerError::Timeout => "REQUEST_TIMEOUT",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Store(err) => match err {
                StoreError::NotFound(_) => "NOT_FOUND",
                StoreError::InvalidId(_) => "INVALID_ID",
                StoreError::Timeout(_) => "STORE_TIMEOUT",
                StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
                StoreError::Decode(_) | StoreError::Config(_) | StoreError::Backend(_) => {
                    "STORE_ERROR"
                }
            },
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "Request rejected");
        }

        (status, Json(self.to_body())).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        ServerError::InvalidId(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::not_found("x"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                StoreError::InvalidId("x".into()),
                StatusCode::BAD_REQUEST,
                "INVALID_ID",
            ),
            (
                StoreError::Timeout(Duration::from_secs(1)),
                StatusCode::GATEWAY_TIMEOUT,
                "STORE_TIMEOUT",
            ),
            (
                StoreError::Unavailable("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_UNAVAILABLE",
            ),
            (
                StoreError::backend("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let err = ServerError::from(err);
            assert_eq!(err.status_code(), status);
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn body_carries_code_and_message() {
        let body = ServerError::BadRequest("bad json".into()).to_body();
        assert_eq!(body.error.code, "BAD_REQUEST");
        assert_eq!(body.error.message, "Bad request: bad json");
    }

    #[test]
    fn routing_errors_map_to_statuses() {
        assert_eq!(
            ServerError::InvalidId("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServerError::InvalidId("bad".into()).error_code(), "INVALID_ID");
        assert_eq!(
            ServerError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ServerError::Timeout.status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(ServerError::Timeout.error_code(), "REQUEST_TIMEOUT");
    }
}
