//! In-memory remote document store

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::NoteNetworkDataSource;
use crate::error::Result;
use crate::models::{Note, NoteId};

/// The two remote collections, keyed by note id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RemoteDocuments {
    #[serde(default)]
    pub notes: BTreeMap<NoteId, Note>,
    #[serde(default)]
    pub deletes: BTreeMap<NoteId, Note>,
}

/// Remote store kept in memory. Cloning shares the same collections, so two
/// caches can sync against one instance.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteNetwork {
    documents: Arc<RwLock<RemoteDocuments>>,
}

impl InMemoryNoteNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the live and tombstone collections.
    pub fn with_notes(
        notes: impl IntoIterator<Item = Note>,
        deleted: impl IntoIterator<Item = Note>,
    ) -> Self {
        let documents = RemoteDocuments {
            notes: notes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            deletes: deleted.into_iter().map(|n| (n.id.clone(), n)).collect(),
        };
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }
}

#[async_trait]
impl NoteNetworkDataSource for InMemoryNoteNetwork {
    async fn insert_or_update_note(&self, note: &Note) -> Result<()> {
        self.documents
            .write()
            .await
            .notes
            .insert(note.id.clone(), note.clone());
        Ok(())
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        self.documents.write().await.notes.remove(id);
        Ok(())
    }

    async fn insert_deleted_note(&self, note: &Note) -> Result<()> {
        self.documents
            .write()
            .await
            .deletes
            .insert(note.id.clone(), note.clone());
        Ok(())
    }

    async fn delete_deleted_note(&self, note: &Note) -> Result<()> {
        self.documents.write().await.deletes.remove(&note.id);
        Ok(())
    }

    async fn get_deleted_notes(&self) -> Result<Vec<Note>> {
        Ok(self.documents.read().await.deletes.values().cloned().collect())
    }

    async fn delete_all_notes(&self) -> Result<()> {
        self.documents.write().await.notes.clear();
        Ok(())
    }

    async fn search_note(&self, note: &Note) -> Result<Option<Note>> {
        Ok(self.documents.read().await.notes.get(&note.id).cloned())
    }

    async fn get_all_notes(&self) -> Result<Vec<Note>> {
        Ok(self.documents.read().await.notes.values().cloned().collect())
    }
}
