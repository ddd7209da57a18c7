//! Database layer for the local note cache

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::SqliteNoteCache;
