use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use crate::model::snapshot::Snapshot;

/// Error type for snapshot persistence
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Opaque string key-value storage the snapshot is written to.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key under a directory
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileKv { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

/// Write via temp file + rename so a reader never sees a partial snapshot.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let path = self.path_for(key);
        atomic_write(&path, value.as_bytes()).map_err(|source| PersistError::Io { path, source })
    }
}

// ---------------------------------------------------------------------------
// Memory backend
// ---------------------------------------------------------------------------

/// Shared in-memory map. Clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| PersistError::Unavailable("memory store poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PersistError::Unavailable("memory store poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Snapshot load/save
// ---------------------------------------------------------------------------

/// Load the snapshot stored under `key`. A missing, unreadable or corrupt
/// snapshot yields `None` and the caller starts from an empty store.
pub fn load_state(kv: &dyn KeyValueStore, key: &str) -> Option<Snapshot> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored snapshot");
            return None;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read snapshot");
            return None;
        }
    };
    match serde_json::from_str::<Snapshot>(&raw) {
        Ok(snapshot) => {
            tracing::info!(
                key,
                boards = snapshot.boards.boards.len(),
                people = snapshot.people.people.len(),
                "loaded snapshot"
            );
            Some(snapshot)
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding corrupt snapshot");
            None
        }
    }
}

pub fn save_state(kv: &dyn KeyValueStore, key: &str, snapshot: &Snapshot) -> Result<(), PersistError> {
    let json = serde_json::to_string(snapshot)?;
    kv.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::Store;
    use crate::ops::board_ops;
    use tempfile::TempDir;

    #[test]
    fn file_kv_round_trip() {
        let dir = TempDir::new().unwrap();
        let kv = FileKv::new(dir.path().join("data"));
        assert_eq!(kv.get("k").unwrap(), None);
        kv.set("k", "{\"a\":1}").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(kv.path_for("k").exists());
        kv.set("k", "{}").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn memory_kv_is_shared_between_clones() {
        let kv = MemoryKv::new();
        let other = kv.clone();
        kv.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(other.write_count(), 1);
    }

    #[test]
    fn save_then_load() {
        let kv = MemoryKv::new();
        let mut store = Store::new();
        board_ops::add_board(&mut store, "Persisted");
        save_state(&kv, "kanbanState", &store.snapshot()).unwrap();

        let loaded = Store::from_snapshot(load_state(&kv, "kanbanState").unwrap());
        assert_eq!(loaded, store);
    }

    #[test]
    fn missing_or_corrupt_snapshot_loads_as_none() {
        let kv = MemoryKv::new();
        assert!(load_state(&kv, "kanbanState").is_none());
        kv.set("kanbanState", "{not json").unwrap();
        assert!(load_state(&kv, "kanbanState").is_none());
    }
}
