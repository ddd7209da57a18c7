//! jotter-core - Core library for Jotter
//!
//! This crate contains the note model, the local cache and remote store
//! contracts with their implementations, the sync engine, and the interactors
//! used by every Jotter client.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod interactors;
pub mod models;
pub mod network;
pub mod services;
pub mod state;
pub mod sync;

#[cfg(test)]
mod testing;

pub use cache::{NoteCacheDataSource, NoteOrder};
pub use config::{JotterConfig, RemoteTarget};
pub use error::{Error, ErrorKind, Result};
pub use models::{Note, NoteFactory, NoteId, SyncReport, Timestamp};
pub use network::NoteNetworkDataSource;
pub use services::NotesService;
pub use state::{DataState, MessageType, Response, StateEvent, UiComponentType};
pub use sync::{SyncSession, TieBreak};
