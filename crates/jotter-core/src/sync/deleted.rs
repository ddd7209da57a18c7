use std::sync::Arc;

use crate::cache::NoteCacheDataSource;
use crate::models::{Note, SyncReport};
use crate::network::NoteNetworkDataSource;
use crate::services::{safe_api_call, safe_cache_call, CallTimeouts};

/// Remove every cached note the remote has tombstoned.
///
/// Must run before [`SyncNotes`](super::SyncNotes), otherwise a note deleted
/// on another device would be pushed back to the remote.
#[derive(Clone)]
pub struct SyncDeletedNotes {
    cache: Arc<dyn NoteCacheDataSource>,
    network: Arc<dyn NoteNetworkDataSource>,
    timeouts: CallTimeouts,
}

impl SyncDeletedNotes {
    pub fn new(
        cache: Arc<dyn NoteCacheDataSource>,
        network: Arc<dyn NoteNetworkDataSource>,
        timeouts: CallTimeouts,
    ) -> Self {
        Self {
            cache,
            network,
            timeouts,
        }
    }

    pub async fn sync_deleted_notes(&self) -> SyncReport {
        let mut report = SyncReport::default();
        let tombstones = self.fetch_tombstones(&mut report).await;
        self.apply_tombstones(&tombstones, &mut report).await;
        report
    }

    /// Remote tombstones, or none when the remote cannot be read.
    pub(crate) async fn fetch_tombstones(&self, report: &mut SyncReport) -> Vec<Note> {
        match safe_api_call(self.timeouts.network, self.network.get_deleted_notes()).await {
            Ok(tombstones) => {
                report.tombstones = tombstones.len();
                tombstones
            }
            Err(error) => {
                report.failures += 1;
                tracing::warn!("Failed to fetch deleted notes: {error}");
                Vec::new()
            }
        }
    }

    pub(crate) async fn apply_tombstones(&self, tombstones: &[Note], report: &mut SyncReport) {
        if tombstones.is_empty() {
            return;
        }

        match safe_cache_call(self.timeouts.cache, self.cache.delete_notes(tombstones)).await {
            Ok(rows) => {
                report.deleted_locally = usize::try_from(rows).unwrap_or(usize::MAX);
                tracing::debug!(rows, "Applied remote tombstones");
            }
            Err(error) => {
                report.failures += 1;
                tracing::warn!("Failed to delete tombstoned notes from cache: {error}");
            }
        }
    }
}
