//! Single-purpose use cases
//!
//! Each interactor performs one cache operation, answers with a
//! [`DataState`](crate::state::DataState), and on success queues the matching
//! remote write. A remote failure never changes the answer already given.

mod count;
mod delete;
mod delete_multiple;
mod insert;
mod restore;
mod search;
mod update;

use std::sync::Arc;

use crate::cache::NoteCacheDataSource;
use crate::services::{CallTimeouts, NetworkWriter};

pub use count::{GetNumNotes, GET_NUM_NOTES_SUCCESS};
pub use delete::{DeleteNote, DELETE_NOTE_FAILED, DELETE_NOTE_SUCCESS};
pub use delete_multiple::{
    DeleteMultipleNotes, DELETE_NOTES_ERRORS, DELETE_NOTES_SUCCESS, DELETE_NOTES_YOU_MUST_SELECT,
};
pub use insert::{InsertNewNote, INSERT_NOTE_FAILED, INSERT_NOTE_SUCCESS};
pub use restore::{RestoreDeletedNote, RESTORE_NOTE_FAILED, RESTORE_NOTE_SUCCESS};
pub use search::{SearchNotes, SEARCH_NOTES_NO_MATCHING_RESULTS, SEARCH_NOTES_SUCCESS};
pub use update::{UpdateNote, UPDATE_NOTE_FAILED, UPDATE_NOTE_SUCCESS};

/// The stores every interactor works against
#[derive(Clone)]
pub struct NoteStores {
    pub cache: Arc<dyn NoteCacheDataSource>,
    pub writer: NetworkWriter,
    pub timeouts: CallTimeouts,
}

impl NoteStores {
    pub fn new(
        cache: Arc<dyn NoteCacheDataSource>,
        writer: NetworkWriter,
        timeouts: CallTimeouts,
    ) -> Self {
        Self {
            cache,
            writer,
            timeouts,
        }
    }
}

/// Every interactor, sharing one set of stores
#[derive(Clone)]
pub struct NoteInteractors {
    pub insert_new_note: InsertNewNote,
    pub delete_note: DeleteNote,
    pub delete_multiple_notes: DeleteMultipleNotes,
    pub restore_deleted_note: RestoreDeletedNote,
    pub search_notes: SearchNotes,
    pub get_num_notes: GetNumNotes,
    pub update_note: UpdateNote,
}

impl NoteInteractors {
    pub fn new(stores: &NoteStores) -> Self {
        Self {
            insert_new_note: InsertNewNote::new(stores.clone()),
            delete_note: DeleteNote::new(stores.clone()),
            delete_multiple_notes: DeleteMultipleNotes::new(stores.clone()),
            restore_deleted_note: RestoreDeletedNote::new(stores.clone()),
            search_notes: SearchNotes::new(stores.clone()),
            get_num_notes: GetNumNotes::new(stores.clone()),
            update_note: UpdateNote::new(stores.clone()),
        }
    }
}
