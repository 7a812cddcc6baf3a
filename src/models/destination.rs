use serde::Deserialize;

/// A configured fan-out target: the channels and role one community uses.
///
/// Destinations are processed independently per tick but share the same
/// fetched sample.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    /// Channel receiving the per-tick status updates.
    pub status_channel_id: u64,

    /// Channel receiving resurrection and severe-drop alerts.
    pub alert_channel_id: u64,

    /// Role mentioned in alerts.
    pub alert_role_id: u64,
}
