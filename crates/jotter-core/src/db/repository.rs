//! SQLite-backed note cache

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::Mutex;

use super::Database;
use crate::cache::{page_limit, NoteCacheDataSource, NoteOrder, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::models::{Note, NoteId, Timestamp};

const NOTE_COLUMNS: &str = "id, title, body, created_at, updated_at";

/// `SQLite` implementation of `NoteCacheDataSource`
///
/// Cloning shares the connection; calls are serialized through a mutex.
#[derive(Clone)]
pub struct SqliteNoteCache {
    db: Arc<Mutex<Database>>,
    page_size: u32,
}

impl SqliteNoteCache {
    /// Wrap an opened database
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Open (or create) the cache file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Open an in-memory cache (primarily for tests)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Parse a note from a database row
    fn parse_note(row: &Row<'_>) -> rusqlite::Result<Note> {
        let id: String = row.get(0)?;
        let created_at: String = row.get(3)?;
        let updated_at: String = row.get(4)?;
        Ok(Note {
            id: id.parse().map_err(|e| conversion_error(0, e))?,
            title: row.get(1)?,
            body: row.get(2)?,
            created_at: created_at.parse().map_err(|e| conversion_error(3, e))?,
            updated_at: updated_at.parse().map_err(|e| conversion_error(4, e))?,
        })
    }

    fn upsert(conn: &rusqlite::Connection, note: &Note) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO notes (id, title, body, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at",
            params![
                note.id.as_str(),
                note.title,
                note.body,
                note.created_at.to_string(),
                note.updated_at.to_string()
            ],
        )
    }
}

fn conversion_error(column: usize, error: crate::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(error))
}

#[async_trait]
impl NoteCacheDataSource for SqliteNoteCache {
    async fn insert_note(&self, note: &Note) -> Result<u64> {
        let db = self.db.lock().await;
        Ok(Self::upsert(db.connection(), note)? as u64)
    }

    async fn insert_notes(&self, notes: &[Note]) -> Result<Vec<u64>> {
        let db = self.db.lock().await;
        let tx = db.connection().unchecked_transaction()?;
        let mut rows = Vec::with_capacity(notes.len());
        for note in notes {
            rows.push(Self::upsert(&tx, note)? as u64);
        }
        tx.commit()?;
        Ok(rows)
    }

    async fn update_note(
        &self,
        id: &NoteId,
        title: &str,
        body: Option<&str>,
        updated_at: Timestamp,
    ) -> Result<u64> {
        let db = self.db.lock().await;
        let rows = db.connection().execute(
            "UPDATE notes SET title = ?, body = ?, updated_at = ? WHERE id = ?",
            params![title, body, updated_at.to_string(), id.as_str()],
        )?;
        Ok(rows as u64)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<u64> {
        let db = self.db.lock().await;
        let rows = db
            .connection()
            .execute("DELETE FROM notes WHERE id = ?", params![id.as_str()])?;
        Ok(rows as u64)
    }

    async fn delete_notes(&self, notes: &[Note]) -> Result<u64> {
        let db = self.db.lock().await;
        let tx = db.connection().unchecked_transaction()?;
        let mut rows = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM notes WHERE id = ?")?;
            for note in notes {
                rows += stmt.execute(params![note.id.as_str()])? as u64;
            }
        }
        tx.commit()?;
        Ok(rows)
    }

    async fn search_notes(&self, query: &str, order: NoteOrder, page: u32) -> Result<Vec<Note>> {
        let limit = page_limit(page, self.page_size) as i64;
        let db = self.db.lock().await;

        let notes = if query.trim().is_empty() {
            let mut stmt = db.connection().prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes ORDER BY {} LIMIT ?",
                order.sql()
            ))?;
            let rows = stmt.query_map(params![limit], Self::parse_note)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = db.connection().prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes
                 WHERE instr(jotter_lower(title), ?1) > 0
                    OR instr(jotter_lower(coalesce(body, '')), ?1) > 0
                 ORDER BY {} LIMIT ?2",
                order.sql()
            ))?;
            let needle = query.trim().to_lowercase();
            let rows = stmt.query_map(params![needle, limit], Self::parse_note)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        Ok(notes)
    }

    async fn get_all_notes(&self) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        let mut stmt = db.connection().prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY {}",
            NoteOrder::UpdatedDesc.sql()
        ))?;
        let notes = stmt
            .query_map([], Self::parse_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    async fn search_note_by_id(&self, id: &NoteId) -> Result<Option<Note>> {
        let db = self.db.lock().await;
        let note = db
            .connection()
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"),
                params![id.as_str()],
                Self::parse_note,
            )
            .optional()?;
        Ok(note)
    }

    async fn get_num_notes(&self) -> Result<u64> {
        let db = self.db.lock().await;
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
