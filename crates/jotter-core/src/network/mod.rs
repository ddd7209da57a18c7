//! Remote document store contract
//!
//! The remote keeps two collections: live notes and tombstones (copies of
//! deleted notes). Tombstones let other devices learn about deletions on their
//! next sync pass.

mod file;
mod http;
mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Note, NoteId};

pub use file::FileNoteNetwork;
pub use http::HttpNoteNetwork;
pub use memory::InMemoryNoteNetwork;

/// Remote CRUD plus deleted-notes tracking
#[async_trait]
pub trait NoteNetworkDataSource: Send + Sync {
    /// Create or replace a note in the live collection.
    async fn insert_or_update_note(&self, note: &Note) -> Result<()>;

    /// Create or replace several notes.
    async fn insert_or_update_notes(&self, notes: &[Note]) -> Result<()> {
        for note in notes {
            self.insert_or_update_note(note).await?;
        }
        Ok(())
    }

    /// Remove a note from the live collection. Missing ids are not an error.
    async fn delete_note(&self, id: &NoteId) -> Result<()>;

    /// Record a tombstone for a deleted note.
    async fn insert_deleted_note(&self, note: &Note) -> Result<()>;

    /// Record tombstones for several notes.
    async fn insert_deleted_notes(&self, notes: &[Note]) -> Result<()> {
        for note in notes {
            self.insert_deleted_note(note).await?;
        }
        Ok(())
    }

    /// Drop the tombstone for a note (used when a delete is undone).
    async fn delete_deleted_note(&self, note: &Note) -> Result<()>;

    /// Every tombstone.
    async fn get_deleted_notes(&self) -> Result<Vec<Note>>;

    /// Empty the live collection.
    async fn delete_all_notes(&self) -> Result<()>;

    /// Look up the live copy of `note` by id.
    async fn search_note(&self, note: &Note) -> Result<Option<Note>>;

    /// Every live note.
    async fn get_all_notes(&self) -> Result<Vec<Note>>;
}
