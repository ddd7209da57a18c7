//! Shared notes service used by clients.

use std::path::Path;
use std::sync::Arc;

use crate::cache::NoteCacheDataSource;
use crate::config::JotterConfig;
use crate::db::SqliteNoteCache;
use crate::error::{Error, Result};
use crate::interactors::{NoteInteractors, NoteStores};
use crate::models::{Note, NoteId, SyncReport};
use crate::network::NoteNetworkDataSource;
use crate::services::{safe_api_call, safe_cache_call, CallTimeouts, NetworkWriter};
use crate::sync::{SyncSession, TieBreak};

/// Cache, optional remote, interactors and sync wired together.
///
/// Must be created inside a tokio runtime: the background network writer is
/// spawned on construction.
#[derive(Clone)]
pub struct NotesService {
    cache: Arc<dyn NoteCacheDataSource>,
    network: Option<Arc<dyn NoteNetworkDataSource>>,
    writer: NetworkWriter,
    interactors: NoteInteractors,
    timeouts: CallTimeouts,
    tie_break: TieBreak,
}

impl NotesService {
    pub fn new(
        cache: Arc<dyn NoteCacheDataSource>,
        network: Option<Arc<dyn NoteNetworkDataSource>>,
        timeouts: CallTimeouts,
        tie_break: TieBreak,
    ) -> Self {
        let writer = network.as_ref().map_or_else(NetworkWriter::disabled, |network| {
            NetworkWriter::spawn(Arc::clone(network), timeouts.network)
        });
        let stores = NoteStores::new(Arc::clone(&cache), writer.clone(), timeouts);
        Self {
            interactors: NoteInteractors::new(&stores),
            cache,
            network,
            writer,
            timeouts,
            tie_break,
        }
    }

    /// Open the SQLite cache at `db_path` and connect the configured remote.
    pub fn open(db_path: &Path, config: &JotterConfig) -> Result<Self> {
        let cache = open_cache_with_recovery(db_path)?.with_page_size(config.page_size);
        let network = config
            .remote_target()
            .map(|target| {
                tracing::debug!("Remote store: {target}");
                target.connect()
            })
            .transpose()?;
        if network.is_none() {
            tracing::debug!("Running in local-only mode (no remote configured)");
        }

        Ok(Self::new(
            Arc::new(cache),
            network,
            config.timeouts(),
            config.tie_break,
        ))
    }

    pub const fn interactors(&self) -> &NoteInteractors {
        &self.interactors
    }

    pub const fn cache(&self) -> &Arc<dyn NoteCacheDataSource> {
        &self.cache
    }

    pub const fn has_remote(&self) -> bool {
        self.network.is_some()
    }

    /// Fetch a cached note by id.
    pub async fn find_note(&self, id: &NoteId) -> Result<Option<Note>> {
        safe_cache_call(self.timeouts.cache, self.cache.search_note_by_id(id)).await
    }

    /// Fetch the remote tombstone for `id`, the copy a restore brings back.
    pub async fn find_deleted_note(&self, id: &NoteId) -> Result<Option<Note>> {
        let network = self.require_remote()?;
        let tombstones = safe_api_call(self.timeouts.network, network.get_deleted_notes()).await?;
        Ok(tombstones.into_iter().find(|note| &note.id == id))
    }

    /// Run a full sync pass after draining queued remote writes.
    pub async fn sync(&self) -> Result<SyncReport> {
        let network = self.require_remote()?;
        self.writer.flush().await;
        let session = SyncSession::new(
            Arc::clone(&self.cache),
            Arc::clone(network),
            self.timeouts,
            self.tie_break,
        );
        Ok(session.run().await)
    }

    /// Wait for queued remote writes. Returns how many have failed so far.
    pub async fn flush(&self) -> u64 {
        self.writer.flush().await;
        self.writer.failed_writes()
    }

    fn require_remote(&self) -> Result<&Arc<dyn NoteNetworkDataSource>> {
        self.network
            .as_ref()
            .ok_or_else(|| Error::Config("no remote configured".into()))
    }
}

/// Open the cache, moving an unreadable database file aside once and
/// starting fresh. Notes come back on the next sync.
fn open_cache_with_recovery(db_path: &Path) -> Result<SqliteNoteCache> {
    match SqliteNoteCache::open(db_path) {
        Err(error) if is_corrupted_db_error(&error) => {
            tracing::warn!(
                "Cache at {} is not a database: {error}. Moving it aside and retrying once.",
                db_path.display()
            );
            quarantine_db_file(db_path)?;
            SqliteNoteCache::open(db_path)
        }
        other => other,
    }
}

fn is_corrupted_db_error(error: &Error) -> bool {
    let message = error.to_string().to_ascii_lowercase();
    message.contains("file is not a database") || message.contains("file is encrypted")
}

fn quarantine_db_file(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        return Ok(());
    }
    let file_name = db_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("jotter.db");
    let backup_name = format!(
        "{file_name}.corrupt-{}",
        chrono::Utc::now().timestamp_millis()
    );
    let backup_path = db_path.with_file_name(backup_name);
    std::fs::rename(db_path, &backup_path)?;
    tracing::warn!(
        "Moved corrupted cache from {} to {}",
        db_path.display(),
        backup_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryNoteCache;
    use crate::network::InMemoryNoteNetwork;
    use crate::state::DataState;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn service_with_remote(network: &InMemoryNoteNetwork) -> NotesService {
        NotesService::new(
            Arc::new(InMemoryNoteCache::new()),
            Some(Arc::new(network.clone())),
            CallTimeouts::default(),
            TieBreak::default(),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn writes_reach_remote_after_flush() {
        let network = InMemoryNoteNetwork::new();
        let service = service_with_remote(&network);

        let note = service
            .interactors()
            .insert_new_note
            .insert_new_note(None, "hello", None)
            .await
            .into_data()
            .unwrap();
        assert_eq!(service.flush().await, 0);

        assert_eq!(network.search_note(&note).await.unwrap(), Some(note));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn local_only_service_refuses_sync() {
        let service = NotesService::new(
            Arc::new(InMemoryNoteCache::new()),
            None,
            CallTimeouts::default(),
            TieBreak::default(),
        );

        let inserted = service
            .interactors()
            .insert_new_note
            .insert_new_note(None, "offline", None)
            .await;
        assert!(inserted.is_success());
        assert!(!service.has_remote());
        assert!(matches!(service.sync().await, Err(Error::Config(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_then_restore_through_tombstone() {
        let network = InMemoryNoteNetwork::new();
        let service = service_with_remote(&network);
        let note = service
            .interactors()
            .insert_new_note
            .insert_new_note(None, "undo me", Some("text".into()))
            .await
            .into_data()
            .unwrap();

        service.interactors().delete_note.delete_note(&note).await;
        service.flush().await;

        let tombstone = service.find_deleted_note(&note.id).await.unwrap().unwrap();
        let restored = service
            .interactors()
            .restore_deleted_note
            .restore_deleted_note(&tombstone)
            .await;
        assert!(matches!(restored, DataState::Data { .. }));
        service.flush().await;

        assert_eq!(service.find_note(&note.id).await.unwrap(), Some(note.clone()));
        assert!(network.get_deleted_notes().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn two_devices_converge_through_shared_file() {
        let tmp = tempdir().unwrap();
        let remote = tmp.path().join("remote.json");
        let config = JotterConfig {
            remote: Some(remote.display().to_string()),
            ..JotterConfig::default()
        };
        let laptop = NotesService::open(&tmp.path().join("laptop.db"), &config).unwrap();
        let phone = NotesService::open(&tmp.path().join("phone.db"), &config).unwrap();

        let note = laptop
            .interactors()
            .insert_new_note
            .insert_new_note(None, "from laptop", None)
            .await
            .into_data()
            .unwrap();
        laptop.flush().await;

        let report = phone.sync().await.unwrap();
        assert_eq!(report.inserted_locally, 1);
        assert_eq!(phone.find_note(&note.id).await.unwrap(), Some(note.clone()));

        phone.interactors().delete_note.delete_note(&note).await;
        phone.flush().await;
        let report = laptop.sync().await.unwrap();
        assert_eq!(report.deleted_locally, 1);
        assert!(laptop.find_note(&note.id).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn corrupted_cache_file_is_moved_aside() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("jotter.db");
        std::fs::write(&db_path, vec![0x42_u8; 4096]).unwrap();

        let service = NotesService::open(&db_path, &JotterConfig::default()).unwrap();
        assert_eq!(service.find_note(&NoteId::new()).await.unwrap(), None);

        let backups = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".corrupt-"))
            .count();
        assert_eq!(backups, 1);
    }
}
