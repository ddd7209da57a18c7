//! Fire-and-forget remote writes
//!
//! Interactors answer as soon as the cache write lands; the matching remote
//! write is queued here and applied in order by a single worker task. Remote
//! failures are logged and counted, never reported to the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::safe_call::safe_api_call;
use crate::error::Result;
use crate::models::{Note, NoteId};
use crate::network::NoteNetworkDataSource;

/// A remote write queued by an interactor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkOp {
    Upsert(Note),
    UpsertMany(Vec<Note>),
    Delete(NoteId),
    InsertTombstone(Note),
    InsertTombstones(Vec<Note>),
    DeleteTombstone(Note),
}

impl NetworkOp {
    const fn name(&self) -> &'static str {
        match self {
            Self::Upsert(_) => "upsert",
            Self::UpsertMany(_) => "upsert_many",
            Self::Delete(_) => "delete",
            Self::InsertTombstone(_) => "insert_tombstone",
            Self::InsertTombstones(_) => "insert_tombstones",
            Self::DeleteTombstone(_) => "delete_tombstone",
        }
    }

    async fn apply(&self, network: &dyn NoteNetworkDataSource) -> Result<()> {
        match self {
            Self::Upsert(note) => network.insert_or_update_note(note).await,
            Self::UpsertMany(notes) => network.insert_or_update_notes(notes).await,
            Self::Delete(id) => network.delete_note(id).await,
            Self::InsertTombstone(note) => network.insert_deleted_note(note).await,
            Self::InsertTombstones(notes) => network.insert_deleted_notes(notes).await,
            Self::DeleteTombstone(note) => network.delete_deleted_note(note).await,
        }
    }
}

enum Command {
    Apply(NetworkOp),
    Flush(oneshot::Sender<()>),
}

#[derive(Debug, Default)]
struct WriterStats {
    applied: AtomicU64,
    failed: AtomicU64,
}

/// Handle to the remote write queue. Clones share one worker.
#[derive(Debug, Clone)]
pub struct NetworkWriter {
    sender: Option<mpsc::UnboundedSender<Command>>,
    stats: Arc<WriterStats>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apply(op) => write!(f, "Apply({})", op.name()),
            Self::Flush(_) => f.write_str("Flush"),
        }
    }
}

impl NetworkWriter {
    /// Start the worker on the current tokio runtime.
    pub fn spawn(network: Arc<dyn NoteNetworkDataSource>, timeout: Duration) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Command>();
        let stats = Arc::new(WriterStats::default());
        let worker_stats = Arc::clone(&stats);

        tokio::spawn(async move {
            while let Some(command) = receiver.recv().await {
                match command {
                    Command::Apply(op) => {
                        match safe_api_call(timeout, op.apply(network.as_ref())).await {
                            Ok(()) => {
                                worker_stats.applied.fetch_add(1, Ordering::Relaxed);
                                tracing::debug!(op = op.name(), "Remote write applied");
                            }
                            Err(error) => {
                                worker_stats.failed.fetch_add(1, Ordering::Relaxed);
                                tracing::warn!(op = op.name(), "Remote write failed: {error}");
                            }
                        }
                    }
                    Command::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("Network writer stopped");
        });

        Self {
            sender: Some(sender),
            stats,
        }
    }

    /// A writer with no remote. Queued writes are dropped.
    pub fn disabled() -> Self {
        Self {
            sender: None,
            stats: Arc::new(WriterStats::default()),
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Queue a remote write. Never blocks.
    pub fn enqueue(&self, op: NetworkOp) {
        let Some(sender) = &self.sender else {
            tracing::debug!(op = op.name(), "No remote configured; skipping write");
            return;
        };
        if sender.send(Command::Apply(op)).is_err() {
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Network writer is gone; remote write dropped");
        }
    }

    /// Wait until every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let Some(sender) = &self.sender else {
            return;
        };
        let (done, waiter) = oneshot::channel();
        if sender.send(Command::Flush(done)).is_ok() {
            let _ = waiter.await;
        }
    }

    /// Remote writes that completed successfully.
    pub fn applied_writes(&self) -> u64 {
        self.stats.applied.load(Ordering::Relaxed)
    }

    /// Remote writes that failed or timed out.
    pub fn failed_writes(&self) -> u64 {
        self.stats.failed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteFactory;
    use crate::network::InMemoryNoteNetwork;
    use crate::testing::FaultyNetwork;

    #[tokio::test]
    async fn applies_writes_in_order() {
        let network = InMemoryNoteNetwork::new();
        let writer = NetworkWriter::spawn(Arc::new(network.clone()), Duration::from_secs(1));
        let mut note = NoteFactory::new().create_single_note(None, "v1", None);

        writer.enqueue(NetworkOp::Upsert(note.clone()));
        note.title = "v2".into();
        writer.enqueue(NetworkOp::Upsert(note.clone()));
        writer.enqueue(NetworkOp::InsertTombstone(note.clone()));
        writer.enqueue(NetworkOp::Delete(note.id.clone()));
        writer.flush().await;

        assert!(network.search_note(&note).await.unwrap().is_none());
        assert_eq!(network.get_deleted_notes().await.unwrap()[0].title, "v2");
        assert_eq!(writer.applied_writes(), 4);
        assert_eq!(writer.failed_writes(), 0);
    }

    #[tokio::test]
    async fn failures_are_counted_not_raised() {
        let network = FaultyNetwork::failing();
        let writer = NetworkWriter::spawn(Arc::new(network), Duration::from_secs(1));
        let note = NoteFactory::new().create_single_note(None, "lost", None);

        writer.enqueue(NetworkOp::Upsert(note.clone()));
        writer.enqueue(NetworkOp::DeleteTombstone(note));
        writer.flush().await;

        assert_eq!(writer.applied_writes(), 0);
        assert_eq!(writer.failed_writes(), 2);
    }

    #[tokio::test]
    async fn disabled_writer_drops_writes() {
        let writer = NetworkWriter::disabled();
        assert!(!writer.is_enabled());

        writer.enqueue(NetworkOp::Delete(NoteId::new()));
        writer.flush().await;
        assert_eq!(writer.applied_writes(), 0);
    }
}
