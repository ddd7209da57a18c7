//! In-memory note cache

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{page_limit, NoteCacheDataSource, NoteOrder, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::models::{Note, NoteId, Timestamp};

/// Cache kept entirely in memory. Cloning shares the same notes.
#[derive(Debug, Clone)]
pub struct InMemoryNoteCache {
    notes: Arc<RwLock<HashMap<NoteId, Note>>>,
    page_size: u32,
}

impl Default for InMemoryNoteCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNoteCache {
    pub fn new() -> Self {
        Self::with_notes(Vec::new())
    }

    /// Seed the cache with notes; later duplicates replace earlier ones.
    pub fn with_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let notes = notes
            .into_iter()
            .map(|note| (note.id.clone(), note))
            .collect();
        Self {
            notes: Arc::new(RwLock::new(notes)),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

#[async_trait]
impl NoteCacheDataSource for InMemoryNoteCache {
    async fn insert_note(&self, note: &Note) -> Result<u64> {
        self.notes
            .write()
            .await
            .insert(note.id.clone(), note.clone());
        Ok(1)
    }

    async fn insert_notes(&self, notes: &[Note]) -> Result<Vec<u64>> {
        let mut guard = self.notes.write().await;
        Ok(notes
            .iter()
            .map(|note| {
                guard.insert(note.id.clone(), note.clone());
                1
            })
            .collect())
    }

    async fn update_note(
        &self,
        id: &NoteId,
        title: &str,
        body: Option<&str>,
        updated_at: Timestamp,
    ) -> Result<u64> {
        let mut guard = self.notes.write().await;
        let Some(note) = guard.get_mut(id) else {
            return Ok(0);
        };
        note.title = title.to_string();
        note.body = body.map(str::to_string);
        note.updated_at = updated_at;
        Ok(1)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<u64> {
        Ok(u64::from(self.notes.write().await.remove(id).is_some()))
    }

    async fn delete_notes(&self, notes: &[Note]) -> Result<u64> {
        let mut guard = self.notes.write().await;
        Ok(notes
            .iter()
            .filter(|note| guard.remove(&note.id).is_some())
            .count() as u64)
    }

    async fn search_notes(&self, query: &str, order: NoteOrder, page: u32) -> Result<Vec<Note>> {
        let guard = self.notes.read().await;
        let mut matches: Vec<Note> = guard
            .values()
            .filter(|note| note.matches(query))
            .cloned()
            .collect();
        matches.sort_by(|a, b| order.compare(a, b));
        matches.truncate(page_limit(page, self.page_size));
        Ok(matches)
    }

    async fn get_all_notes(&self) -> Result<Vec<Note>> {
        let guard = self.notes.read().await;
        let mut notes: Vec<Note> = guard.values().cloned().collect();
        notes.sort_by(|a, b| NoteOrder::UpdatedDesc.compare(a, b));
        Ok(notes)
    }

    async fn search_note_by_id(&self, id: &NoteId) -> Result<Option<Note>> {
        Ok(self.notes.read().await.get(id).cloned())
    }

    async fn get_num_notes(&self) -> Result<u64> {
        Ok(self.notes.read().await.len() as u64)
    }
}
