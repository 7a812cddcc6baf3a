//! Handler for the `/command` endpoint.
//!
//! Accepted commands are queued for the command handler; the HTTP response
//! only acknowledges enqueueing, not completion.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc::error::TrySendError;

use super::{ApiError, ApiState};
use crate::models::{CommandEvent, CommandKind};

/// Represents the payload for the `/command` endpoint.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    /// Raw command token, e.g. `"!plr"`.
    pub command: String,

    /// Channel the reply should go to.
    pub channel_id: u64,

    /// User issuing the command, checked against the owner for restarts.
    pub requester_id: u64,
}

/// Parses and enqueues a command for asynchronous processing.
pub async fn submit_command(
    State(state): State<ApiState>,
    Json(payload): Json<CommandRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = CommandKind::parse(&payload.command).ok_or_else(|| {
        ApiError::UnprocessableEntity(format!("Unknown command '{}'", payload.command))
    })?;

    let event = CommandEvent {
        kind,
        channel_id: payload.channel_id,
        requester_id: payload.requester_id,
    };

    state.command_tx.try_send(event).map_err(|e| match e {
        TrySendError::Full(_) => ApiError::Overloaded,
        TrySendError::Closed(_) =>
            ApiError::InternalServerError("Command handler is not running".to_string()),
    })?;

    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "accepted" }))))
}
