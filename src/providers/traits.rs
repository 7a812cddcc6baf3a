//! This module defines the interface for fetching the monitored player count.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::models::Sample;

/// Custom error type for player-count sources.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The endpoint did not answer within the configured timeout.
    #[error("Fetch timed out")]
    Timeout,

    /// Error while talking to the endpoint.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status code.
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// The response body was not valid JSON.
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// The response carried a player-count field that could not be read.
    #[error("Malformed player-count field: {0}")]
    Field(String),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// A trait for a source that reports the monitored server's player count.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlayerCountSource: Send + Sync {
    /// Fetches the current player count, stamped with the fetch time.
    async fn fetch(&self) -> Result<Sample, FetchError>;
}
