use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::ActivityKind;

/// A struct to hold the monitor's runtime status.
#[derive(Debug, Clone)]
pub struct Status {
    /// The time the monitor started.
    pub start_time: tokio::time::Instant,

    /// Activity kind of the advertised presence.
    pub activity: ActivityKind,

    /// Text of the advertised presence, e.g. `"5,123 (+40) online players"`.
    pub presence_text: String,

    /// Player count of the latest completed tick.
    pub last_count: Option<u64>,

    /// When the latest completed tick finished.
    pub last_seen: Option<DateTime<Utc>>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            start_time: tokio::time::Instant::now(),
            activity: ActivityKind::default(),
            presence_text: String::new(),
            last_count: None,
            last_seen: None,
        }
    }
}

/// Shared runtime status for the HTTP server.
#[derive(Clone, Default)]
pub struct AppStatus {
    /// Shared status.
    pub status: Arc<RwLock<Status>>,
}
