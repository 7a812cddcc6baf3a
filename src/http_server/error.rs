//! Defines the custom `ApiError` type for the HTTP server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use thiserror::Error;

/// A custom error type for the API that can be converted into an HTTP response.
pub enum ApiError {
    /// Represents a validation error for an unprocessable entity.
    UnprocessableEntity(String),

    /// Represents a full command queue.
    Overloaded,

    /// Represents a generic internal server error.
    InternalServerError(String),
}

/// Implements the conversion from `ApiError` into an `axum` response.
///
/// This is the central point for mapping internal application errors to
/// user-facing HTTP responses.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::UnprocessableEntity(message) =>
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": message })),
            ApiError::Overloaded => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "Command queue is full, try again shortly" }),
            ),
            ApiError::InternalServerError(err) => {
                tracing::error!("Internal server error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal server error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Errors that can prevent the HTTP server from starting.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// The configured listen address could not be parsed.
    #[error("Invalid listen address '{0}'")]
    InvalidListenAddress(String),

    /// Binding the listener or serving requests failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
