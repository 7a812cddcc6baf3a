use std::fmt;

/// Server health as judged by the on-demand report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    /// Population is consistent with the recent history.
    Normal,

    /// Too many recent samples sit far below the fresh count.
    Lagging,

    /// The count is inside the maintenance band.
    Maintenance,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServerStatus::Normal => "Normal",
            ServerStatus::Lagging => "Server Lagging",
            ServerStatus::Maintenance => "Maintenance",
        };
        write!(f, "{label}")
    }
}
