//! Local note cache contract
//!
//! The cache is the authoritative store for immediate reads and writes. Every
//! write reports the number of rows it affected so callers can tell "nothing
//! happened" apart from a failure.

mod memory;
mod order;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Note, NoteId, Timestamp};

pub use memory::InMemoryNoteCache;
pub use order::NoteOrder;

/// Rows returned per search page. Pages are cumulative: page `n` returns up
/// to `n * page_size` rows.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Local CRUD and search over notes
#[async_trait]
pub trait NoteCacheDataSource: Send + Sync {
    /// Insert a note, replacing any row with the same id. Returns rows affected.
    async fn insert_note(&self, note: &Note) -> Result<u64>;

    /// Insert several notes. Returns rows affected per note, in order.
    async fn insert_notes(&self, notes: &[Note]) -> Result<Vec<u64>>;

    /// Overwrite title and body of an existing note and stamp `updated_at`.
    async fn update_note(
        &self,
        id: &NoteId,
        title: &str,
        body: Option<&str>,
        updated_at: Timestamp,
    ) -> Result<u64>;

    /// Delete a note by id. Returns rows affected.
    async fn delete_note(&self, id: &NoteId) -> Result<u64>;

    /// Delete every listed note that exists. Returns rows affected.
    async fn delete_notes(&self, notes: &[Note]) -> Result<u64>;

    /// Case-insensitive substring search over title and body.
    async fn search_notes(&self, query: &str, order: NoteOrder, page: u32) -> Result<Vec<Note>>;

    /// Every cached note, newest update first.
    async fn get_all_notes(&self) -> Result<Vec<Note>>;

    /// Look a note up by id.
    async fn search_note_by_id(&self, id: &NoteId) -> Result<Option<Note>>;

    /// Number of cached notes.
    async fn get_num_notes(&self) -> Result<u64>;
}

/// Row limit for a cumulative page; pages below 1 count as 1.
pub(crate) fn page_limit(page: u32, page_size: u32) -> usize {
    let page = page.max(1) as usize;
    page.saturating_mul(page_size as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_limit_is_cumulative() {
        assert_eq!(page_limit(1, 30), 30);
        assert_eq!(page_limit(3, 30), 90);
    }

    #[test]
    fn page_limit_clamps_zero_page() {
        assert_eq!(page_limit(0, 30), 30);
    }
}
