use std::sync::Arc;
use std::time::Duration;

use crate::io::persist::{KeyValueStore, load_state};
use crate::io::writer::SnapshotWriter;
use crate::model::config::StorageConfig;
use crate::model::store::Store;
use crate::ops::command::{self, Command, Outcome};

/// A store wired to its persistence bridge.
///
/// Every state-changing command schedules a snapshot on the background
/// writer. Dropping the session flushes the last one.
pub struct Session {
    store: Store,
    writer: Option<SnapshotWriter>,
}

impl Session {
    /// Load the stored snapshot (or start empty) and start the writer.
    pub fn open(kv: Arc<dyn KeyValueStore>, storage: &StorageConfig) -> std::io::Result<Session> {
        let store = load_state(kv.as_ref(), &storage.key)
            .map(Store::from_snapshot)
            .unwrap_or_default();
        let writer = SnapshotWriter::spawn(
            kv,
            storage.key.clone(),
            Duration::from_millis(storage.flush_interval_ms),
        )?;
        Ok(Session {
            store,
            writer: Some(writer),
        })
    }

    /// Session with no persistence
    pub fn in_memory(store: Store) -> Session {
        Session {
            store,
            writer: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn dispatch(&mut self, command: Command) -> Outcome {
        let outcome = command::apply(&mut self.store, command);
        if outcome.changed() {
            self.persist();
        }
        outcome
    }

    /// Schedule a write of the current state.
    pub fn persist(&self) {
        if let Some(writer) = &self.writer {
            writer.schedule(self.store.snapshot());
        }
    }

    /// Flush pending writes and hand back the store.
    pub fn close(mut self) -> Store {
        self.writer.take();
        std::mem::take(&mut self.store)
    }
}
