//! Data models shared across the monitor.

mod command;
mod destination;
mod presence;
mod report;
mod sample;
mod status;

pub use command::{CommandEvent, CommandKind};
pub use destination::Destination;
pub use presence::ActivityKind;
pub use report::StatusReport;
pub use sample::{HistoryRecord, RecordError, Sample, format_count};
pub use status::ServerStatus;
