//! This module contains the sample-history persistence for the monitor.

pub mod error;
pub mod history;
pub use history::{HISTORY_CAPACITY, HistoryStore};
