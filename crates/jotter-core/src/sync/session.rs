use std::collections::HashSet;
use std::sync::Arc;

use super::{SyncDeletedNotes, SyncNotes, TieBreak};
use crate::cache::NoteCacheDataSource;
use crate::models::{NoteId, SyncReport};
use crate::network::NoteNetworkDataSource;
use crate::services::CallTimeouts;

/// One full reconciliation pass: tombstones first, then live notes.
#[derive(Clone)]
pub struct SyncSession {
    deleted: SyncDeletedNotes,
    notes: SyncNotes,
}

impl SyncSession {
    pub fn new(
        cache: Arc<dyn NoteCacheDataSource>,
        network: Arc<dyn NoteNetworkDataSource>,
        timeouts: CallTimeouts,
        tie_break: TieBreak,
    ) -> Self {
        Self {
            deleted: SyncDeletedNotes::new(Arc::clone(&cache), Arc::clone(&network), timeouts),
            notes: SyncNotes::new(cache, network, timeouts).with_tie_break(tie_break),
        }
    }

    pub async fn run(&self) -> SyncReport {
        let mut report = SyncReport::default();

        let tombstones = self.deleted.fetch_tombstones(&mut report).await;
        self.deleted.apply_tombstones(&tombstones, &mut report).await;

        let tombstoned: HashSet<NoteId> = tombstones.into_iter().map(|note| note.id).collect();
        let notes = self.notes.sync_notes_excluding(&tombstoned).await;
        report.merge(&notes);

        tracing::info!(
            deleted = report.deleted_locally,
            changes = report.changes(),
            failures = report.failures,
            "Sync pass complete"
        );
        report
    }
}
