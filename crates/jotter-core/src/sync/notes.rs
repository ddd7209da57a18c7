use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::TieBreak;
use crate::cache::NoteCacheDataSource;
use crate::models::{Note, NoteId, SyncReport};
use crate::network::NoteNetworkDataSource;
use crate::services::{safe_api_call, safe_cache_call, CallTimeouts};

/// Last-write-wins reconciliation of live notes.
///
/// Remote notes missing from the cache are inserted, stale copies on either
/// side are overwritten by the newer one, and cached notes the remote has
/// never seen are pushed.
#[derive(Clone)]
pub struct SyncNotes {
    cache: Arc<dyn NoteCacheDataSource>,
    network: Arc<dyn NoteNetworkDataSource>,
    timeouts: CallTimeouts,
    tie_break: TieBreak,
}

impl SyncNotes {
    pub fn new(
        cache: Arc<dyn NoteCacheDataSource>,
        network: Arc<dyn NoteNetworkDataSource>,
        timeouts: CallTimeouts,
    ) -> Self {
        Self {
            cache,
            network,
            timeouts,
            tie_break: TieBreak::default(),
        }
    }

    #[must_use]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub const fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub async fn sync_notes(&self) -> SyncReport {
        self.sync_notes_excluding(&HashSet::new()).await
    }

    /// Reconcile, treating `tombstoned` ids as deleted: they are never
    /// inserted into the cache nor pushed to the remote.
    pub(crate) async fn sync_notes_excluding(&self, tombstoned: &HashSet<NoteId>) -> SyncReport {
        let mut report = SyncReport::default();

        let cached = match safe_cache_call(self.timeouts.cache, self.cache.get_all_notes()).await {
            Ok(notes) => notes,
            Err(error) => {
                report.failures += 1;
                tracing::warn!("Failed to load cached notes: {error}");
                Vec::new()
            }
        };
        report.cache_notes = cached.len();

        let remote_result =
            safe_api_call(self.timeouts.network, self.network.get_all_notes()).await;
        let remote = match remote_result {
            Ok(notes) => notes,
            Err(error) => {
                report.failures += 1;
                tracing::warn!("Failed to load remote notes, skipping note sync: {error}");
                return report;
            }
        };
        report.remote_notes = remote.len();

        let working_set: HashMap<NoteId, Note> = cached
            .into_iter()
            .map(|note| (note.id.clone(), note))
            .collect();

        let reconcile = Reconcile {
            cache: Arc::clone(&self.cache),
            network: Arc::clone(&self.network),
            timeouts: self.timeouts,
            tie_break: self.tie_break,
            tombstoned: tombstoned.clone(),
        };
        let task = tokio::spawn(async move { reconcile.run(remote, working_set).await });

        let leftovers = match task.await {
            Ok((leftovers, partial)) => {
                report.merge(&partial);
                leftovers
            }
            Err(error) => {
                report.failures += 1;
                tracing::error!("Note reconciliation task failed: {error}");
                return report;
            }
        };

        for note in leftovers.into_values() {
            if tombstoned.contains(&note.id) {
                tracing::debug!(note_id = %note.id, "Not pushing tombstoned note");
                continue;
            }
            match safe_api_call(
                self.timeouts.network,
                self.network.insert_or_update_note(&note),
            )
            .await
            {
                Ok(()) => report.pushed_remote += 1,
                Err(error) => {
                    report.failures += 1;
                    tracing::warn!(note_id = %note.id, "Failed to push local note: {error}");
                }
            }
        }

        tracing::info!(
            pulled = report.inserted_locally,
            updated = report.updated_locally,
            pushed = report.pushed_remote,
            failures = report.failures,
            "Note sync finished"
        );
        report
    }
}

/// State moved into the reconciliation task.
struct Reconcile {
    cache: Arc<dyn NoteCacheDataSource>,
    network: Arc<dyn NoteNetworkDataSource>,
    timeouts: CallTimeouts,
    tie_break: TieBreak,
    tombstoned: HashSet<NoteId>,
}

impl Reconcile {
    /// Walk the remote notes; returns the cached notes the remote never
    /// mentioned along with the counters.
    async fn run(
        self,
        remote: Vec<Note>,
        mut working_set: HashMap<NoteId, Note>,
    ) -> (HashMap<NoteId, Note>, SyncReport) {
        let mut report = SyncReport::default();

        for remote_note in remote {
            if self.tombstoned.contains(&remote_note.id) {
                working_set.remove(&remote_note.id);
                tracing::debug!(note_id = %remote_note.id, "Skipping tombstoned remote note");
                continue;
            }

            let lookup = safe_cache_call(
                self.timeouts.cache,
                self.cache.search_note_by_id(&remote_note.id),
            )
            .await;

            match lookup {
                Ok(Some(cached_note)) => {
                    working_set.remove(&cached_note.id);
                    self.resolve(cached_note, remote_note, &mut report).await;
                }
                Ok(None) => self.pull(&remote_note, &mut report).await,
                Err(error) => {
                    working_set.remove(&remote_note.id);
                    report.failures += 1;
                    tracing::warn!(note_id = %remote_note.id, "Cache lookup failed: {error}");
                }
            }
        }

        (working_set, report)
    }

    async fn resolve(&self, cached: Note, remote: Note, report: &mut SyncReport) {
        if remote.is_newer_than(&cached) {
            self.take_remote(&remote, report).await;
        } else if cached.is_newer_than(&remote) {
            self.push(&cached, report).await;
        } else {
            match self.tie_break {
                TieBreak::PreferCache => self.push(&cached, report).await,
                TieBreak::PreferRemote => self.take_remote(&remote, report).await,
                TieBreak::Skip => report.unchanged += 1,
            }
        }
    }

    async fn pull(&self, remote: &Note, report: &mut SyncReport) {
        match safe_cache_call(self.timeouts.cache, self.cache.insert_note(remote)).await {
            Ok(_) => report.inserted_locally += 1,
            Err(error) => {
                report.failures += 1;
                tracing::warn!(note_id = %remote.id, "Failed to insert remote note: {error}");
            }
        }
    }

    async fn take_remote(&self, remote: &Note, report: &mut SyncReport) {
        tracing::debug!(
            note_id = %remote.id,
            remote_updated_at = %remote.updated_at,
            "Remote copy is newer"
        );
        let result = safe_cache_call(
            self.timeouts.cache,
            self.cache.update_note(
                &remote.id,
                &remote.title,
                remote.body.as_deref(),
                remote.updated_at,
            ),
        )
        .await;
        match result {
            Ok(rows) if rows > 0 => report.updated_locally += 1,
            Ok(_) => {
                report.failures += 1;
                tracing::warn!(note_id = %remote.id, "Cached note vanished before update");
            }
            Err(error) => {
                report.failures += 1;
                tracing::warn!(note_id = %remote.id, "Failed to update cached note: {error}");
            }
        }
    }

    async fn push(&self, cached: &Note, report: &mut SyncReport) {
        let result = safe_api_call(
            self.timeouts.network,
            self.network.insert_or_update_note(cached),
        )
        .await;
        match result {
            Ok(()) => report.pushed_remote += 1,
            Err(error) => {
                report.failures += 1;
                tracing::warn!(note_id = %cached.id, "Failed to push cached note: {error}");
            }
        }
    }
}
