use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of activity kinds the presence indicator can advertise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// "Playing ..." activity.
    Playing,

    /// "Streaming ..." activity.
    Streaming,

    /// "Listening to ..." activity.
    Listening,

    /// "Watching ..." activity.
    #[default]
    Watching,

    /// "Competing in ..." activity.
    Competing,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityKind::Playing => "playing",
            ActivityKind::Streaming => "streaming",
            ActivityKind::Listening => "listening",
            ActivityKind::Watching => "watching",
            ActivityKind::Competing => "competing",
        };
        write!(f, "{label}")
    }
}
