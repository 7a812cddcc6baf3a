//! Error types for the notification service.

use thiserror::Error;

use crate::http_client::HttpClientError;

/// Defines the possible errors that can occur within the notification service.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// An error related to invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error indicating that the notification failed to be sent.
    #[error("Notification failed: {0}")]
    NotifyFailed(String),

    /// An error that occurs when serializing a payload.
    #[error("Failed to serialize payload: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// An error originating from building the HTTP client.
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] HttpClientError),

    /// An error from the `reqwest_middleware` dispatch stack.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest_middleware::Error),

    /// An error from the underlying `reqwest` library.
    #[error("Request error: {0}")]
    HttpError(#[from] reqwest::Error),
}
