//! Pure classification rules applied to each polling tick.

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{Sample, ServerStatus, format_count};

/// Counts at or below this are treated as the server being in maintenance.
pub const MAINTENANCE_THRESHOLD: u64 = 1500;

/// Deltas below this raise a severe-drop alert.
pub const SEVERE_DROP_DELTA: i64 = -1500;

/// Crossing this count from below raises a resurrection alert.
pub const RESURRECTION_THRESHOLD: u64 = 2000;

/// Window scanned by the lag heuristic, in seconds.
const LAG_WINDOW_SECS: i64 = 3600;

/// How far below the fresh count a sample must sit to count as a lag mark.
const LAG_COUNT_MARGIN: u64 = 500;

/// More lag marks than this classify the server as lagging.
const LAG_SAMPLE_LIMIT: usize = 10;

/// Outcome of classifying one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// Status message, without the timestamp prefix.
    pub message: String,

    /// The count fell by more than the severe-drop threshold.
    pub severe_drop: bool,
}

/// Classifies a tick against the previous count.
///
/// Positive deltas render with an explicit `+`, negative ones with a plain
/// minus. The maintenance check has final precedence over the delta message.
pub fn assess(previous: u64, count: u64) -> Assessment {
    let delta = count as i64 - previous as i64;
    let severe_drop = delta < SEVERE_DROP_DELTA;

    let mut message = if previous == 0 || delta == 0 {
        format!("{} online players.", format_count(count))
    } else if delta > 0 {
        format!("{} (+{}) online players", format_count(count), delta)
    } else {
        format!("{} ({}) online players", format_count(count), delta)
    };

    if count <= MAINTENANCE_THRESHOLD {
        message = "SERVER MAINTENANCE!".to_string();
    }

    Assessment { message, severe_drop }
}

/// Percentage change against the previous count, rounded to two decimals.
/// Zero when there is no baseline yet.
pub fn drop_rate(previous: u64, count: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    let rate = (count as f64 - previous as f64) / previous as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Whether the tick crosses the resurrection threshold, judged against the
/// last persisted sample.
pub fn resurrected(last_persisted: Option<Sample>, count: u64) -> bool {
    last_persisted
        .is_some_and(|prev| prev.count < RESURRECTION_THRESHOLD && count > RESURRECTION_THRESHOLD)
}

/// Classifies the server for an on-demand report.
///
/// Maintenance takes precedence. Otherwise the last hour of history is
/// scanned for samples sitting far below the fresh count; too many of them
/// mark the server as lagging.
pub fn report_status(fresh: u64, samples: &[Sample], now: DateTime<Utc>) -> ServerStatus {
    if fresh <= MAINTENANCE_THRESHOLD {
        return ServerStatus::Maintenance;
    }

    let window_start = now - TimeDelta::seconds(LAG_WINDOW_SECS);
    let lag_marks = samples
        .iter()
        .filter(|s| s.timestamp >= window_start && s.count + LAG_COUNT_MARGIN < fresh)
        .count();

    if lag_marks > LAG_SAMPLE_LIMIT { ServerStatus::Lagging } else { ServerStatus::Normal }
}
