//! Database connection management

use crate::error::Result;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// Scalar SQL function folding text with Unicode lowercase rules.
///
/// Matches `str::to_lowercase`; built-in `lower()`, `LIKE` and `NOCASE` only
/// fold ASCII.
const LOWER_FN: &str = "jotter_lower";

/// Wrapper around the local SQLite connection backing the note cache
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let database = Self {
            conn: Connection::open(path)?,
        };
        database.configure()?;
        database.migrate()?;
        tracing::debug!("Opened note cache at {}", path.display());
        Ok(database)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let database = Self {
            conn: Connection::open_in_memory()?,
        };
        database.configure()?;
        database.migrate()?;
        Ok(database)
    }

    /// Configure `SQLite` for optimal performance
    fn configure(&self) -> Result<()> {
        // journal_mode returns a row; in-memory databases report "memory" and ignore WAL.
        self.conn
            .query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))
            .ok();
        self.conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA cache_size = 10000;",
        )?;
        self.conn.create_scalar_function(
            LOWER_FN,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text: Option<String> = ctx.get(0)?;
                Ok(text.map(|text| text.to_lowercase()))
            },
        )?;
        Ok(())
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn)
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let one: i32 = db
            .connection()
            .query_row("SELECT 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(one, 1);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("jotter.db");

        Database::open(&db_path).unwrap();
        assert!(db_path.exists());

        // Reopening runs migrations again without failing
        Database::open(&db_path).unwrap();
    }

    #[test]
    fn lower_function_folds_non_ascii_text() {
        let db = Database::open_in_memory().unwrap();
        let folded: String = db
            .connection()
            .query_row("SELECT jotter_lower('ÉCOLE Ünïcode ΣΟΦΙΑ')", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(folded, "école ünïcode σοφια");

        let null: Option<String> = db
            .connection()
            .query_row("SELECT jotter_lower(NULL)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }
}
