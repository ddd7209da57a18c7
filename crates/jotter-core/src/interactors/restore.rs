use super::NoteStores;
use crate::models::Note;
use crate::services::{handle_cache_result, safe_cache_call, NetworkOp};
use crate::state::{DataState, MessageType, Response, StateEvent, UiComponentType};

pub const RESTORE_NOTE_SUCCESS: &str = "Successfully restored the deleted note.";
pub const RESTORE_NOTE_FAILED: &str = "Failed to restore the deleted note.";

/// Undo a delete: put the note back and drop its tombstone.
#[derive(Clone)]
pub struct RestoreDeletedNote {
    stores: NoteStores,
}

impl RestoreDeletedNote {
    pub const fn new(stores: NoteStores) -> Self {
        Self { stores }
    }

    pub async fn restore_deleted_note(&self, note: &Note) -> DataState<Note> {
        let result = safe_cache_call(
            self.stores.timeouts.cache,
            self.stores.cache.insert_note(note),
        )
        .await;

        let state = handle_cache_result(result, StateEvent::RestoreDeletedNote, |rows, event| {
            if rows > 0 {
                DataState::data(
                    Response::new(
                        RESTORE_NOTE_SUCCESS,
                        UiComponentType::Toast,
                        MessageType::Success,
                    ),
                    Some(note.clone()),
                    event,
                )
            } else {
                DataState::data(
                    Response::new(
                        RESTORE_NOTE_FAILED,
                        UiComponentType::Toast,
                        MessageType::Error,
                    ),
                    None,
                    event,
                )
            }
        });

        if state.is_success() {
            self.stores.writer.enqueue(NetworkOp::Upsert(note.clone()));
            self.stores
                .writer
                .enqueue(NetworkOp::DeleteTombstone(note.clone()));
        }
        state
    }
}
