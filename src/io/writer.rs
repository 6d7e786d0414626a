use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::io::persist::{KeyValueStore, save_state};
use crate::model::snapshot::Snapshot;

/// Debounced background snapshot writer.
///
/// `schedule` never blocks on storage. The first snapshot after an idle
/// period arms a deadline `interval` ahead; snapshots arriving before the
/// deadline replace the pending one, and the latest is written once when the
/// deadline passes. Dropping the writer flushes anything still pending.
pub struct SnapshotWriter {
    tx: Option<mpsc::Sender<Snapshot>>,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotWriter {
    pub fn spawn(kv: Arc<dyn KeyValueStore>, key: impl Into<String>, interval: Duration) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Snapshot>();
        let key = key.into();
        let handle = thread::Builder::new()
            .name("snapshot-writer".into())
            .spawn(move || run(rx, kv.as_ref(), &key, interval))?;
        Ok(SnapshotWriter {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue a snapshot for write-back.
    pub fn schedule(&self, snapshot: Snapshot) {
        if let Some(tx) = &self.tx
            && tx.send(snapshot).is_err()
        {
            tracing::warn!("snapshot writer stopped; dropping snapshot");
        }
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        // closing the channel makes the worker flush and exit
        self.tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("snapshot writer panicked");
        }
    }
}

fn flush(kv: &dyn KeyValueStore, key: &str, snapshot: &Snapshot) {
    match save_state(kv, key, snapshot) {
        Ok(()) => tracing::info!(key, "snapshot written"),
        Err(e) => tracing::warn!(key, error = %e, "snapshot write failed"),
    }
}

fn run(rx: mpsc::Receiver<Snapshot>, kv: &dyn KeyValueStore, key: &str, interval: Duration) {
    let mut pending: Option<Snapshot> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let received = match deadline {
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            Some(at) => rx.recv_timeout(at.saturating_duration_since(Instant::now())),
        };
        match received {
            Ok(snapshot) => {
                pending = Some(snapshot);
                if deadline.is_none() {
                    deadline = Some(Instant::now() + interval);
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Some(snapshot) = pending.take() {
                    flush(kv, key, &snapshot);
                }
                deadline = None;
            }
            Err(RecvTimeoutError::Disconnected) => {
                if let Some(snapshot) = pending.take() {
                    flush(kv, key, &snapshot);
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::persist::{MemoryKv, load_state};
    use crate::model::store::Store;
    use crate::ops::board_ops;

    fn snapshot_with_boards(n: usize) -> Snapshot {
        let mut store = Store::new();
        for i in 0..n {
            board_ops::add_board(&mut store, &format!("B{}", i));
        }
        store.snapshot()
    }

    #[test]
    fn bursts_coalesce_into_one_write() {
        let kv = MemoryKv::new();
        let writer = SnapshotWriter::spawn(Arc::new(kv.clone()), "k", Duration::from_secs(10)).unwrap();
        for n in 1..=5 {
            writer.schedule(snapshot_with_boards(n));
        }
        drop(writer);

        assert_eq!(kv.write_count(), 1);
        let stored = load_state(&kv, "k").unwrap();
        assert_eq!(stored.boards.boards.len(), 5);
    }

    #[test]
    fn deadline_flushes_without_drop() {
        let kv = MemoryKv::new();
        let writer = SnapshotWriter::spawn(Arc::new(kv.clone()), "k", Duration::from_millis(20)).unwrap();
        writer.schedule(snapshot_with_boards(1));
        let start = Instant::now();
        while kv.write_count() == 0 && start.elapsed() < Duration::from_secs(5) {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(kv.write_count(), 1);

        writer.schedule(snapshot_with_boards(2));
        drop(writer);
        assert_eq!(kv.write_count(), 2);
    }

    #[test]
    fn idle_writer_writes_nothing() {
        let kv = MemoryKv::new();
        let writer = SnapshotWriter::spawn(Arc::new(kv.clone()), "k", Duration::from_millis(1)).unwrap();
        drop(writer);
        assert_eq!(kv.write_count(), 0);
    }
}
