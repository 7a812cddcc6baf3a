//! A builder for creating `Sample` instances for testing.

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::Sample;

/// A builder for creating `Sample` instances for testing.
#[derive(Debug, Clone)]
pub struct SampleBuilder {
    count: u64,
    timestamp: DateTime<Utc>,
}

impl Default for SampleBuilder {
    fn default() -> Self {
        Self { count: 0, timestamp: Utc::now() }
    }
}

impl SampleBuilder {
    /// Creates a new `SampleBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the player count.
    pub fn count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// Sets the observation timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Backdates the sample by the given number of seconds.
    pub fn age_secs(mut self, secs: i64) -> Self {
        self.timestamp = Utc::now() - TimeDelta::seconds(secs);
        self
    }

    /// Builds the `Sample` with the provided values.
    pub fn build(self) -> Sample {
        Sample { count: self.count, timestamp: self.timestamp }
    }
}
