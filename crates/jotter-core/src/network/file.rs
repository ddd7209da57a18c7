//! Remote document store backed by a single JSON file
//!
//! Useful for syncing two local caches through a shared folder. Writers hold
//! an exclusive lock on a `<file>.lock` sidecar for the whole
//! load-modify-store cycle, so separate processes never drop each other's
//! changes. The file itself is replaced through a uniquely named temp file
//! and an atomic rename, so readers never see a torn write.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use super::memory::RemoteDocuments;
use super::NoteNetworkDataSource;
use crate::error::{Error, Result};
use crate::models::{Note, NoteId};

pub struct FileNoteNetwork {
    path: PathBuf,
}

impl FileNoteNetwork {
    /// Use the document file at `path`; it is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, mutate and persist while holding the cross-process write lock.
    async fn modify(
        &self,
        change: impl FnOnce(&mut RemoteDocuments) + Send + 'static,
    ) -> Result<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let directory = parent_dir(&path);
            fs::create_dir_all(directory)?;
            let lock_file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(lock_path(&path))?;
            let mut lock = fd_lock::RwLock::new(lock_file);
            let _guard = lock.write()?;

            let mut documents = load(&path)?;
            change(&mut documents);
            store(&path, &documents)
        })
        .await
        .map_err(|error| Error::Network(format!("file store task failed: {error}")))?
    }

    async fn read(&self) -> Result<RemoteDocuments> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load(&path))
            .await
            .map_err(|error| Error::Network(format!("file store task failed: {error}")))?
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("remote"), ToOwned::to_owned);
    name.push(".lock");
    path.with_file_name(name)
}

fn load(path: &Path) -> Result<RemoteDocuments> {
    match fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => Ok(RemoteDocuments::default()),
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            Ok(RemoteDocuments::default())
        }
        Err(error) => Err(error.into()),
    }
}

fn store(path: &Path, documents: &RemoteDocuments) -> Result<()> {
    let mut temp = NamedTempFile::new_in(parent_dir(path))?;
    serde_json::to_writer_pretty(&mut temp, documents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|error| error.error)?;
    Ok(())
}

#[async_trait]
impl NoteNetworkDataSource for FileNoteNetwork {
    async fn insert_or_update_note(&self, note: &Note) -> Result<()> {
        let note = note.clone();
        self.modify(move |docs| {
            docs.notes.insert(note.id.clone(), note);
        })
        .await
    }

    async fn insert_or_update_notes(&self, notes: &[Note]) -> Result<()> {
        let notes = notes.to_vec();
        self.modify(move |docs| {
            for note in notes {
                docs.notes.insert(note.id.clone(), note);
            }
        })
        .await
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let id = id.clone();
        self.modify(move |docs| {
            docs.notes.remove(&id);
        })
        .await
    }

    async fn insert_deleted_note(&self, note: &Note) -> Result<()> {
        let note = note.clone();
        self.modify(move |docs| {
            docs.deletes.insert(note.id.clone(), note);
        })
        .await
    }

    async fn insert_deleted_notes(&self, notes: &[Note]) -> Result<()> {
        let notes = notes.to_vec();
        self.modify(move |docs| {
            for note in notes {
                docs.deletes.insert(note.id.clone(), note);
            }
        })
        .await
    }

    async fn delete_deleted_note(&self, note: &Note) -> Result<()> {
        let id = note.id.clone();
        self.modify(move |docs| {
            docs.deletes.remove(&id);
        })
        .await
    }

    async fn get_deleted_notes(&self) -> Result<Vec<Note>> {
        Ok(self.read().await?.deletes.into_values().collect())
    }

    async fn delete_all_notes(&self) -> Result<()> {
        self.modify(|docs| docs.notes.clear()).await
    }

    async fn search_note(&self, note: &Note) -> Result<Option<Note>> {
        Ok(self.read().await?.notes.remove(&note.id))
    }

    async fn get_all_notes(&self) -> Result<Vec<Note>> {
        Ok(self.read().await?.notes.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteFactory;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_file_reads_as_empty() {
        let tmp = tempdir().unwrap();
        let network = FileNoteNetwork::new(tmp.path().join("remote.json"));

        assert!(network.get_all_notes().await.unwrap().is_empty());
        assert!(network.get_deleted_notes().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn writes_are_visible_to_a_second_handle() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("shared").join("remote.json");
        let note = NoteFactory::new().create_single_note(None, "shared", Some("body".into()));

        FileNoteNetwork::new(&path)
            .insert_or_update_note(&note)
            .await
            .unwrap();

        let other = FileNoteNetwork::new(&path);
        assert_eq!(other.search_note(&note).await.unwrap(), Some(note.clone()));
        let mut entries = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        entries.sort();
        assert_eq!(entries, vec!["remote.json", "remote.json.lock"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_moves_note_to_tombstones() {
        let tmp = tempdir().unwrap();
        let network = FileNoteNetwork::new(tmp.path().join("remote.json"));
        let notes = NoteFactory::new().create_note_list(2);

        network.insert_or_update_notes(&notes).await.unwrap();
        network.delete_note(&notes[0].id).await.unwrap();
        network.insert_deleted_note(&notes[0]).await.unwrap();

        assert_eq!(network.get_all_notes().await.unwrap(), vec![notes[1].clone()]);
        assert_eq!(
            network.get_deleted_notes().await.unwrap(),
            vec![notes[0].clone()]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn corrupt_file_is_a_serialization_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("remote.json");
        std::fs::write(&path, "{not json").unwrap();

        let error = FileNoteNetwork::new(&path).get_all_notes().await.unwrap_err();
        assert!(matches!(error, crate::Error::Serialization(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_on_two_handles_keep_every_note() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("remote.json");
        let first = std::sync::Arc::new(FileNoteNetwork::new(&path));
        let second = std::sync::Arc::new(FileNoteNetwork::new(&path));
        let notes = NoteFactory::new().create_note_list(40);

        let tasks = notes
            .iter()
            .enumerate()
            .map(|(index, note)| {
                let network = if index % 2 == 0 {
                    std::sync::Arc::clone(&first)
                } else {
                    std::sync::Arc::clone(&second)
                };
                let note = note.clone();
                tokio::spawn(async move { network.insert_or_update_note(&note).await })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = FileNoteNetwork::new(&path).get_all_notes().await.unwrap();
        assert_eq!(stored.len(), notes.len());
        for note in &notes {
            assert!(stored.contains(note));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn tombstone_written_alongside_upserts_is_not_lost() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("remote.json");
        let laptop = std::sync::Arc::new(FileNoteNetwork::new(&path));
        let phone = std::sync::Arc::new(FileNoteNetwork::new(&path));
        let notes = NoteFactory::new().create_note_list(10);
        let deleted = NoteFactory::new().create_single_note(None, "gone", None);

        let upserts = {
            let laptop = std::sync::Arc::clone(&laptop);
            let notes = notes.clone();
            tokio::spawn(async move {
                for note in &notes {
                    laptop.insert_or_update_note(note).await.unwrap();
                }
            })
        };
        phone.insert_deleted_note(&deleted).await.unwrap();
        upserts.await.unwrap();

        assert_eq!(phone.get_deleted_notes().await.unwrap(), vec![deleted]);
        assert_eq!(laptop.get_all_notes().await.unwrap().len(), notes.len());
    }
}
