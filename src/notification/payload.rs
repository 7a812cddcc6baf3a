//! # Chat Payload Builders
//!
//! This module constructs the JSON payloads sent to the chat REST API. Plain
//! status updates and alerts use a bare `content` field; on-demand reports use
//! an embed that references the chart uploaded alongside it.

use serde_json::json;

use crate::models::{StatusReport, format_count};

/// Accent color of report embeds.
const EMBED_COLOR: u32 = 0x7b86da;

/// File name the chart is uploaded under; the embed references it by name.
pub const CHART_FILENAME: &str = "chart.png";

/// Builds the payload for a plain text message.
pub fn message_payload(content: &str) -> serde_json::Value {
    json!({ "content": content })
}

/// Builds the payload for an on-demand status report.
///
/// The embed's image points at the chart attachment, which must be uploaded
/// in the same request under [`CHART_FILENAME`].
pub fn report_payload(report: &StatusReport, footer: Option<&str>) -> serde_json::Value {
    let mut embed = json!({
        "title": "Server status",
        "color": EMBED_COLOR,
        "fields": [
            { "name": "Online players", "value": format_count(report.count), "inline": true },
            { "name": "Server status", "value": report.status.to_string(), "inline": true },
        ],
        "image": { "url": format!("attachment://{CHART_FILENAME}") },
        "timestamp": report.generated_at.to_rfc3339(),
    });
    if let Some(text) = footer {
        embed["footer"] = json!({ "text": text });
    }

    json!({
        "embeds": [embed],
        "attachments": [{ "id": 0, "filename": CHART_FILENAME }],
    })
}
