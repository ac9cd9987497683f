//! Persistent counter storage
//!
//! A small keyed store for durable integer counters. The timer core only ever
//! uses one key (the cumulative study total), written on pause/reset/shutdown
//! and read once at startup. Entries carry a retention hint; expired entries
//! are treated as absent at load time.

use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Key under which the cumulative study total is persisted
pub const COUNTER_KEY: &str = "total_study_seconds";

/// Retention hint for the study counter
pub const COUNTER_RETENTION_DAYS: u32 = 365;

/// Storage collaborator boundary.
///
/// `load` returns the raw stored string; callers own parsing, so a corrupt
/// value degrades to "no prior value" instead of an error.
pub trait CounterStore: Send + Sync {
    fn save(&self, key: &str, value: u64, retention_days: u32) -> anyhow::Result<()>;
    fn load(&self, key: &str) -> Option<String>;
}

/// One stored counter with its expiry timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    value: String,
    saved_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// File-backed counter store: a single JSON file of keyed entries
#[derive(Debug)]
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_entries(&self) -> HashMap<String, StoredEntry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Counter file {} not readable: {}", self.path.display(), e);
                return HashMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Counter file {} is corrupt, ignoring it: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }
}

impl CounterStore for FileCounterStore {
    fn save(&self, key: &str, value: u64, retention_days: u32) -> anyhow::Result<()> {
        let mut entries = self.read_entries();
        let now = Utc::now();
        entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                saved_at: now,
                expires_at: now + Duration::days(i64::from(retention_days)),
            },
        );

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let raw = serde_json::to_string_pretty(&entries).context("failed to encode counter file")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        debug!("Saved {}={} to {}", key, value, self.path.display());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        let entry = self.read_entries().remove(key)?;
        if entry.expires_at <= Utc::now() {
            debug!("Stored value for {} expired at {}, treating as absent", key, entry.expires_at);
            return None;
        }
        Some(entry.value)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = FileCounterStore::new(dir.path().join("counter.json"));

        store.save(COUNTER_KEY, 9000, COUNTER_RETENTION_DAYS).unwrap();
        assert_eq!(store.load(COUNTER_KEY), Some("9000".to_string()));
    }

    #[test]
    fn missing_file_loads_as_absent() {
        let dir = tempdir().unwrap();
        let store = FileCounterStore::new(dir.path().join("nope.json"));
        assert_eq!(store.load(COUNTER_KEY), None);
    }

    #[test]
    fn corrupt_file_loads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileCounterStore::new(path);
        assert_eq!(store.load(COUNTER_KEY), None);
    }

    #[test]
    fn expired_entry_loads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.json");

        let mut entries = HashMap::new();
        entries.insert(
            COUNTER_KEY.to_string(),
            StoredEntry {
                value: "1234".to_string(),
                saved_at: Utc::now() - Duration::days(400),
                expires_at: Utc::now() - Duration::days(35),
            },
        );
        fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();

        let store = FileCounterStore::new(path);
        assert_eq!(store.load(COUNTER_KEY), None);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = FileCounterStore::new(dir.path().join("state/nested/counter.json"));

        store.save(COUNTER_KEY, 42, COUNTER_RETENTION_DAYS).unwrap();
        assert_eq!(store.load(COUNTER_KEY), Some("42".to_string()));
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let store = FileCounterStore::new(dir.path().join("counter.json"));

        store.save(COUNTER_KEY, 10, COUNTER_RETENTION_DAYS).unwrap();
        store.save(COUNTER_KEY, 0, COUNTER_RETENTION_DAYS).unwrap();
        assert_eq!(store.load(COUNTER_KEY), Some("0".to_string()));
    }
}
