use chrono::{DateTime, Utc};

use super::ServerStatus;

/// The data behind an on-demand status reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    /// Freshly fetched player count.
    pub count: u64,

    /// Health classification for the report.
    pub status: ServerStatus,

    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
}
