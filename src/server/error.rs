//! # API Errors
//!
//! The ways an image fetch can fail, mapped onto HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error returned by the catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No image with this id (404). Holds the id as requested, which may
    /// be negative or wider than any stored id.
    #[error("Image not found: {0}")]
    NotFound(String),

    /// Path segment is not an integer (422)
    #[error("Invalid image id: {0}")]
    InvalidId(String),

    /// Fault injected by the response simulator (500)
    #[error("Simulated server fault")]
    ServerFault,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ServerFault => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Result type alias for catalog operations and handlers.
pub type ApiResult<T> = Result<T, ApiError>;
