//! Represents the `/status` endpoint handler and response structure.
//! Provides application status and runtime state.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

use super::{ApiError, ApiState};

/// Represents the response from the `/status` endpoint.
#[derive(Debug, Serialize, Clone)]
pub struct StatusResponse {
    /// The version of the application.
    pub version: String,
    /// The uptime of the application in seconds.
    pub uptime_secs: u64,
    /// The presence line mirroring the latest classified status.
    pub presence: String,
    /// The most recent accepted player count, if any tick succeeded yet.
    pub last_count: Option<u64>,
    /// The timestamp of the most recent accepted sample in seconds.
    pub last_sample_timestamp_secs: Option<i64>,
    /// The number of samples currently on record.
    pub history_len: usize,
}

/// Retrieves application status and runtime state.
pub async fn status(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let history_len = state.history.len().await;
    let status = state.app_status.status.read().await;
    let response = StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: status.start_time.elapsed().as_secs(),
        presence: status.presence_text.clone(),
        last_count: status.last_count,
        last_sample_timestamp_secs: status.last_seen.map(|seen| seen.timestamp()),
        history_len,
    };
    Ok((StatusCode::OK, Json(response)))
}
