//! A file-backed, capacity-bounded store for the sample history.

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};

use tokio::sync::RwLock;

use super::error::PersistenceError;
use crate::models::{HistoryRecord, Sample};

/// Maximum number of samples retained in the history.
pub const HISTORY_CAPACITY: usize = 700;

/// The persisted sample history.
///
/// The on-disk format is the legacy one: a JSON array of records with a
/// comma-grouped `player` string and a fractional-seconds `date`, so history
/// files written by earlier deployments keep working unchanged.
#[derive(Debug)]
pub struct HistoryStore {
    samples: RwLock<VecDeque<Sample>>,
    path: PathBuf,
}

impl HistoryStore {
    /// Loads the history from the given path.
    ///
    /// Loading never fails: a missing or unreadable file yields an empty
    /// history, and individual records that cannot be parsed are skipped.
    pub async fn load(path: PathBuf) -> Self {
        let samples = match tokio::fs::read(&path).await {
            Ok(bytes) => Self::parse(&bytes, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No history file found. Starting with an empty history.");
                VecDeque::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Could not read history file. Starting with an empty history.");
                VecDeque::new()
            }
        };

        Self { samples: RwLock::new(samples), path }
    }

    fn parse(bytes: &[u8], path: &Path) -> VecDeque<Sample> {
        let records: Vec<HistoryRecord> = match serde_json::from_slice(bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "History file is unreadable. Starting with an empty history.");
                return VecDeque::new();
            }
        };

        let mut samples = VecDeque::with_capacity(records.len().min(HISTORY_CAPACITY));
        for record in &records {
            match Sample::try_from(record) {
                Ok(sample) => samples.push_back(sample),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable history record.");
                }
            }
        }
        while samples.len() > HISTORY_CAPACITY {
            samples.pop_front();
        }

        tracing::info!(samples = samples.len(), path = %path.display(), "Loaded sample history.");
        samples
    }

    /// Appends a sample, evicting the oldest entries beyond capacity, and
    /// persists the full history to disk.
    pub async fn append(&self, sample: Sample) -> Result<(), PersistenceError> {
        let mut samples = self.samples.write().await;
        samples.push_back(sample);
        while samples.len() > HISTORY_CAPACITY {
            samples.pop_front();
        }
        self.persist(&samples).await
    }

    /// Returns the most recent sample, if any.
    pub async fn last(&self) -> Option<Sample> {
        self.samples.read().await.back().copied()
    }

    /// Returns the number of retained samples.
    pub async fn len(&self) -> usize {
        self.samples.read().await.len()
    }

    /// Returns `true` when no samples are retained.
    pub async fn is_empty(&self) -> bool {
        self.samples.read().await.is_empty()
    }

    /// Returns the retained samples, oldest first.
    pub async fn snapshot(&self) -> Vec<Sample> {
        self.samples.read().await.iter().copied().collect()
    }

    /// Writes the full history to a sibling temp file and renames it into
    /// place, so a crash mid-write never leaves a truncated history behind.
    async fn persist(&self, samples: &VecDeque<Sample>) -> Result<(), PersistenceError> {
        let records: Vec<HistoryRecord> = samples.iter().map(HistoryRecord::from).collect();
        let bytes = serde_json::to_vec(&records)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, &bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("database.json")
    }

    #[tokio::test]
    async fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::load(history_path(&dir)).await;

        assert!(store.is_empty().await);
        assert!(store.last().await.is_none());
    }

    #[tokio::test]
    async fn test_load_unreadable_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = history_path(&dir);
        std::fs::write(&path, "definitely not json").unwrap();

        let store = HistoryStore::load(path).await;
        assert!(store.is_empty().await);

        // The store must still accept writes after a bad load.
        store.append(Sample::now(150)).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_load_skips_unreadable_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = history_path(&dir);
        std::fs::write(
            &path,
            r#"[{"player": "1,234", "date": 1700000000.5},
                {"player": "soon", "date": 1700000060.0},
                {"player": "987", "date": 1700000120.0}]"#,
        )
        .unwrap();

        let store = HistoryStore::load(path).await;

        let samples = store.snapshot().await;
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].count, 1234);
        assert_eq!(samples[1].count, 987);
    }

    #[tokio::test]
    async fn test_append_persists_legacy_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = history_path(&dir);

        let store = HistoryStore::load(path.clone()).await;
        store.append(Sample::now(20500)).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""player":"20,500""#));

        let reloaded = HistoryStore::load(path).await;
        assert_eq!(reloaded.last().await.unwrap().count, 20500);
    }

    #[tokio::test]
    async fn test_append_evicts_beyond_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::load(history_path(&dir)).await;

        for count in 0..(HISTORY_CAPACITY as u64 + 5) {
            store.append(Sample::now(count)).await.unwrap();
        }

        assert_eq!(store.len().await, HISTORY_CAPACITY);
        let samples = store.snapshot().await;
        assert_eq!(samples.first().unwrap().count, 5);
        assert_eq!(samples.last().unwrap().count, HISTORY_CAPACITY as u64 + 4);
    }

    #[tokio::test]
    async fn test_load_truncates_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = history_path(&dir);

        let records: Vec<HistoryRecord> = (0..(HISTORY_CAPACITY as u64 + 10))
            .map(|count| HistoryRecord::from(&Sample::now(count)))
            .collect();
        std::fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();

        let store = HistoryStore::load(path).await;

        assert_eq!(store.len().await, HISTORY_CAPACITY);
        assert_eq!(store.snapshot().await.first().unwrap().count, 10);
    }

    #[tokio::test]
    async fn test_persist_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = history_path(&dir);

        let store = HistoryStore::load(path.clone()).await;
        store.append(Sample::now(42)).await.unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("database.json.tmp").exists());
    }
}
