use super::NoteStores;
use crate::models::Note;
use crate::services::{handle_cache_result, safe_cache_call, NetworkOp};
use crate::state::{DataState, MessageType, Response, StateEvent, UiComponentType};

pub const DELETE_NOTE_SUCCESS: &str = "Successfully deleted note.";
pub const DELETE_NOTE_FAILED: &str = "Failed to delete note.";

/// Delete a note from the cache, then remove it remotely and record a
/// tombstone so other devices drop it too.
#[derive(Clone)]
pub struct DeleteNote {
    stores: NoteStores,
}

impl DeleteNote {
    pub const fn new(stores: NoteStores) -> Self {
        Self { stores }
    }

    pub async fn delete_note(&self, note: &Note) -> DataState<Note> {
        let result = safe_cache_call(
            self.stores.timeouts.cache,
            self.stores.cache.delete_note(&note.id),
        )
        .await;

        let state = handle_cache_result(result, StateEvent::DeleteNote, |rows, event| {
            let response = if rows > 0 {
                Response::new(
                    DELETE_NOTE_SUCCESS,
                    UiComponentType::None,
                    MessageType::Success,
                )
            } else {
                Response::new(
                    DELETE_NOTE_FAILED,
                    UiComponentType::Toast,
                    MessageType::Error,
                )
            };
            DataState::data(response, Some(note.clone()), event)
        });

        if state.is_success() {
            self.stores.writer.enqueue(NetworkOp::Delete(note.id.clone()));
            self.stores
                .writer
                .enqueue(NetworkOp::InsertTombstone(note.clone()));
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoteCacheDataSource;
    use crate::interactors::fixtures::Harness;
    use crate::models::NoteFactory;
    use crate::network::NoteNetworkDataSource;
    use crate::services::CACHE_ERROR_UNKNOWN;
    use crate::testing::{forced_id, FORCE_EXCEPTION};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn delete_note_success_confirm_network_updated() {
        let note = NoteFactory::new().create_single_note(None, "doomed", None);
        let harness = Harness::new(vec![note.clone()], vec![note.clone()], Vec::new());
        let interactor = DeleteNote::new(harness.stores.clone());

        let state = interactor.delete_note(&note).await;

        assert_eq!(state.message(), DELETE_NOTE_SUCCESS);
        assert!(harness.cache.search_note_by_id(&note.id).await.unwrap().is_none());

        harness.flush().await;
        assert!(harness.network.search_note(&note).await.unwrap().is_none());
        assert_eq!(
            harness.network.get_deleted_notes().await.unwrap(),
            vec![note]
        );
    }

    #[tokio::test]
    async fn delete_missing_note_fail_confirm_network_unchanged() {
        let present = NoteFactory::new().create_single_note(None, "kept", None);
        let missing = NoteFactory::new().create_single_note(None, "missing", None);
        let harness = Harness::new(vec![present.clone()], vec![present.clone()], Vec::new());
        let interactor = DeleteNote::new(harness.stores.clone());

        let state = interactor.delete_note(&missing).await;

        assert_eq!(state.message(), DELETE_NOTE_FAILED);
        assert!(!state.is_success());
        harness.flush().await;
        assert_eq!(harness.network.get_all_notes().await.unwrap(), vec![present]);
        assert!(harness.network.get_deleted_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn throw_exception_check_generic_error() {
        let mut note = NoteFactory::new().create_single_note(None, "boom", None);
        note.id = forced_id(FORCE_EXCEPTION);
        let harness = Harness::empty();
        let interactor = DeleteNote::new(harness.stores.clone());

        let state = interactor.delete_note(&note).await;

        assert!(matches!(state, DataState::Error { .. }));
        assert!(state.message().contains(CACHE_ERROR_UNKNOWN));
        harness.flush().await;
        assert!(harness.network.get_deleted_notes().await.unwrap().is_empty());
    }
}
