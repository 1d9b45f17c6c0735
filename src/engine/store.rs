//! Best-score persistence.
//!
//! A store holds integer scalars by key, like browser local storage. Writes
//! are fire-and-forget: a file store that cannot write logs the failure and
//! keeps the value in memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::engine::error::LabError;

pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<i64>;
    fn set(&mut self, key: &str, value: i64);
}

/// Which direction counts as an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOrder {
    LowerIsBetter,
    HigherIsBetter,
}

impl ScoreOrder {
    pub fn improves(self, candidate: i64, current: i64) -> bool {
        match self {
            ScoreOrder::LowerIsBetter => candidate < current,
            ScoreOrder::HigherIsBetter => candidate > current,
        }
    }
}

/// Store `value` under `key` if nothing is stored yet or it beats the stored
/// value. Returns whether a write happened.
pub fn record_best(store: &mut dyn ScoreStore, key: &str, value: i64, order: ScoreOrder) -> bool {
    let improved = match store.get(key) {
        None => true,
        Some(current) => order.improves(value, current),
    };
    if improved {
        tracing::info!(key, value, "new best score");
        store.set(key, value);
    }
    improved
}

/// Volatile store for tests and sessions without a score file.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }
}

/// Store persisted as a flat JSON object, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LabError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| LabError::ScoreFile {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(LabError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "opened score store");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write score file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_best_lower_is_better() {
        let mut store = MemoryStore::new();
        assert!(record_best(&mut store, "moves", 20, ScoreOrder::LowerIsBetter));
        assert!(!record_best(&mut store, "moves", 24, ScoreOrder::LowerIsBetter));
        assert!(!record_best(&mut store, "moves", 20, ScoreOrder::LowerIsBetter));
        assert!(record_best(&mut store, "moves", 18, ScoreOrder::LowerIsBetter));
        assert_eq!(store.get("moves"), Some(18));
    }

    #[test]
    fn test_record_best_higher_is_better() {
        let mut store = MemoryStore::new();
        assert!(record_best(&mut store, "wpm", 40, ScoreOrder::HigherIsBetter));
        assert!(!record_best(&mut store, "wpm", 35, ScoreOrder::HigherIsBetter));
        assert!(record_best(&mut store, "wpm", 55, ScoreOrder::HigherIsBetter));
        assert_eq!(store.get("wpm"), Some(55));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("memory-best-score"), None);
        store.set("memory-best-score", 22);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("memory-best-score"), Some(22));
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(LabError::ScoreFile { .. })));
    }

    #[test]
    fn test_unwritable_file_keeps_value_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("scores.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("typing-best-wpm", 61);
        assert_eq!(store.get("typing-best-wpm"), Some(61));
    }
}
