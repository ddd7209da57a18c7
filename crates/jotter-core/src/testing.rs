//! Test doubles that fail on demand

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{InMemoryNoteCache, NoteCacheDataSource, NoteOrder};
use crate::error::{Error, Result};
use crate::models::{Note, NoteId, Timestamp};
use crate::network::{InMemoryNoteNetwork, NoteNetworkDataSource};

/// Any cache call touching this id fails.
pub const FORCE_EXCEPTION: &str = "force-exception";
/// Any cache write touching this id affects zero rows.
pub const FORCE_GENERAL_FAILURE: &str = "force-general-failure";
/// A search with this query fails.
pub const FORCE_SEARCH_EXCEPTION: &str = "force-search-exception";

pub fn forced_id(raw: &str) -> NoteId {
    raw.parse().expect("forced ids are non-empty")
}

/// In-memory cache that fails for the magic ids above, or for every call
/// once `fail_all` is set.
#[derive(Debug, Clone, Default)]
pub struct FaultyCache {
    inner: InMemoryNoteCache,
    fail_all: Arc<AtomicBool>,
}

impl FaultyCache {
    pub fn new(inner: InMemoryNoteCache) -> Self {
        Self {
            inner,
            fail_all: Arc::default(),
        }
    }

    pub fn set_fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    pub const fn inner(&self) -> &InMemoryNoteCache {
        &self.inner
    }

    fn check(&self, id: Option<&NoteId>) -> Result<bool> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(Error::Cache("forced failure".into()));
        }
        match id.map(NoteId::as_str) {
            Some(FORCE_EXCEPTION) => Err(Error::Cache("forced exception".into())),
            Some(FORCE_GENERAL_FAILURE) => Ok(false),
            _ => Ok(true),
        }
    }
}

#[async_trait]
impl NoteCacheDataSource for FaultyCache {
    async fn insert_note(&self, note: &Note) -> Result<u64> {
        if !self.check(Some(&note.id))? {
            return Ok(0);
        }
        self.inner.insert_note(note).await
    }

    async fn insert_notes(&self, notes: &[Note]) -> Result<Vec<u64>> {
        let mut rows = Vec::with_capacity(notes.len());
        for note in notes {
            rows.push(self.insert_note(note).await?);
        }
        Ok(rows)
    }

    async fn update_note(
        &self,
        id: &NoteId,
        title: &str,
        body: Option<&str>,
        updated_at: Timestamp,
    ) -> Result<u64> {
        if !self.check(Some(id))? {
            return Ok(0);
        }
        self.inner.update_note(id, title, body, updated_at).await
    }

    async fn delete_note(&self, id: &NoteId) -> Result<u64> {
        if !self.check(Some(id))? {
            return Ok(0);
        }
        self.inner.delete_note(id).await
    }

    async fn delete_notes(&self, notes: &[Note]) -> Result<u64> {
        let mut kept = Vec::with_capacity(notes.len());
        for note in notes {
            if self.check(Some(&note.id))? {
                kept.push(note.clone());
            }
        }
        self.inner.delete_notes(&kept).await
    }

    async fn search_notes(&self, query: &str, order: NoteOrder, page: u32) -> Result<Vec<Note>> {
        self.check(None)?;
        if query == FORCE_SEARCH_EXCEPTION {
            return Err(Error::Cache("forced search exception".into()));
        }
        self.inner.search_notes(query, order, page).await
    }

    async fn get_all_notes(&self) -> Result<Vec<Note>> {
        self.check(None)?;
        self.inner.get_all_notes().await
    }

    async fn search_note_by_id(&self, id: &NoteId) -> Result<Option<Note>> {
        self.check(Some(id))?;
        self.inner.search_note_by_id(id).await
    }

    async fn get_num_notes(&self) -> Result<u64> {
        self.check(None)?;
        self.inner.get_num_notes().await
    }
}

/// In-memory remote that rejects every call while `failing` is set.
#[derive(Debug, Clone, Default)]
pub struct FaultyNetwork {
    inner: InMemoryNoteNetwork,
    failing: Arc<AtomicBool>,
}

impl FaultyNetwork {
    pub fn new(inner: InMemoryNoteNetwork) -> Self {
        Self {
            inner,
            failing: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        let network = Self::default();
        network.set_failing(true);
        network
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(Error::Network("remote unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NoteNetworkDataSource for FaultyNetwork {
    async fn insert_or_update_note(&self, note: &Note) -> Result<()> {
        self.check()?;
        self.inner.insert_or_update_note(note).await
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        self.check()?;
        self.inner.delete_note(id).await
    }

    async fn insert_deleted_note(&self, note: &Note) -> Result<()> {
        self.check()?;
        self.inner.insert_deleted_note(note).await
    }

    async fn delete_deleted_note(&self, note: &Note) -> Result<()> {
        self.check()?;
        self.inner.delete_deleted_note(note).await
    }

    async fn get_deleted_notes(&self) -> Result<Vec<Note>> {
        self.check()?;
        self.inner.get_deleted_notes().await
    }

    async fn delete_all_notes(&self) -> Result<()> {
        self.check()?;
        self.inner.delete_all_notes().await
    }

    async fn search_note(&self, note: &Note) -> Result<Option<Note>> {
        self.check()?;
        self.inner.search_note(note).await
    }

    async fn get_all_notes(&self) -> Result<Vec<Note>> {
        self.check()?;
        self.inner.get_all_notes().await
    }
}
