//! Sync pass summary

use serde::{Deserialize, Serialize};

/// Counters collected during one reconciliation pass.
///
/// Failures are counted, never raised: the pass always runs to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Tombstones fetched from the remote store
    pub tombstones: usize,
    /// Cache rows removed because a tombstone named them
    pub deleted_locally: usize,
    /// Notes read from the cache at the start of the pass
    pub cache_notes: usize,
    /// Notes read from the remote store
    pub remote_notes: usize,
    /// Remote notes that did not exist in the cache and were inserted
    pub inserted_locally: usize,
    /// Cache notes overwritten by a newer remote version
    pub updated_locally: usize,
    /// Cache notes upserted into the remote store
    pub pushed_remote: usize,
    /// Notes left as-is because both sides carried the same timestamp
    pub unchanged: usize,
    /// Individual cache or network calls that failed and were skipped
    pub failures: usize,
}

impl SyncReport {
    /// Total number of writes performed on either side.
    pub const fn changes(&self) -> usize {
        self.deleted_locally + self.inserted_locally + self.updated_locally + self.pushed_remote
    }

    /// Fold the counters of a partial pass into this one.
    pub fn merge(&mut self, other: &Self) {
        self.tombstones += other.tombstones;
        self.deleted_locally += other.deleted_locally;
        self.cache_notes += other.cache_notes;
        self.remote_notes += other.remote_notes;
        self.inserted_locally += other.inserted_locally;
        self.updated_locally += other.updated_locally;
        self.pushed_remote += other.pushed_remote;
        self.unchanged += other.unchanged;
        self.failures += other.failures;
    }
}
