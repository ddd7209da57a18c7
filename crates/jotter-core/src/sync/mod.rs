//! Cache/remote reconciliation
//!
//! A pass first applies remote tombstones to the cache
//! ([`SyncDeletedNotes`]), then reconciles live notes with last-write-wins on
//! `updated_at` ([`SyncNotes`]). [`SyncSession`] runs both in that order.
//! Sync never fails as a whole: every cache or network error is logged,
//! counted in the [`SyncReport`](crate::models::SyncReport), and skipped.

mod deleted;
mod notes;
mod session;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use deleted::SyncDeletedNotes;
pub use notes::SyncNotes;
pub use session::SyncSession;

/// Which side wins when both copies of a note carry the same `updated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Push the cache copy to the remote.
    #[default]
    PreferCache,
    /// Overwrite the cache copy with the remote one.
    PreferRemote,
    /// Leave both sides alone.
    Skip,
}

impl TieBreak {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreferCache => "prefer_cache",
            Self::PreferRemote => "prefer_remote",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "prefer_cache" | "cache" => Ok(Self::PreferCache),
            "prefer_remote" | "remote" => Ok(Self::PreferRemote),
            "skip" => Ok(Self::Skip),
            other => Err(Error::InvalidInput(format!(
                "unknown tie-break '{other}' (expected prefer_cache, prefer_remote or skip)"
            ))),
        }
    }
}
