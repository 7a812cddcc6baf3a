//! Player-count samples and their legacy on-disk representation.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One observation of the server population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Online-player count reported by the server.
    pub count: u64,

    /// Time the observation was taken.
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    /// Creates a sample taken now.
    pub fn now(count: u64) -> Self {
        Self { count, timestamp: Utc::now() }
    }
}

/// Formats a count with thousands separators, e.g. `5123` as `"5,123"`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Errors produced while converting a stored record back into a [`Sample`].
#[derive(Debug, Error)]
pub enum RecordError {
    /// The stored count was not a comma-grouped integer.
    #[error("Unparsable player count {0:?}")]
    Count(String),

    /// The stored timestamp does not map to a valid instant.
    #[error("Out-of-range timestamp {0}")]
    Timestamp(f64),
}

/// On-disk form of a [`Sample`].
///
/// The state file predates this implementation: counts are stored as
/// comma-grouped strings and timestamps as float unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    /// Comma-grouped player count, e.g. `"5,123"`.
    pub player: String,

    /// Unix timestamp in seconds, fractional part allowed.
    pub date: f64,
}

impl From<&Sample> for HistoryRecord {
    fn from(sample: &Sample) -> Self {
        let date = sample.timestamp.timestamp() as f64
            + f64::from(sample.timestamp.timestamp_subsec_micros()) / 1_000_000.0;
        Self { player: format_count(sample.count), date }
    }
}

impl TryFrom<&HistoryRecord> for Sample {
    type Error = RecordError;

    fn try_from(record: &HistoryRecord) -> Result<Self, Self::Error> {
        let count = record
            .player
            .replace(',', "")
            .parse::<u64>()
            .map_err(|_| RecordError::Count(record.player.clone()))?;

        let secs = record.date.trunc() as i64;
        let nanos = (record.date.fract() * 1e9) as u32;
        let timestamp = Utc
            .timestamp_opt(secs, nanos)
            .single()
            .ok_or(RecordError::Timestamp(record.date))?;

        Ok(Self { count, timestamp })
    }
}
