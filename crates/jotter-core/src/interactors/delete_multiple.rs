use super::NoteStores;
use crate::models::Note;
use crate::services::{safe_cache_call, NetworkOp};
use crate::state::{DataState, MessageType, Response, StateEvent, UiComponentType};

pub const DELETE_NOTES_SUCCESS: &str = "Successfully deleted the selected notes.";
pub const DELETE_NOTES_ERRORS: &str =
    "Not all the notes you selected were deleted. There was some problems.";
pub const DELETE_NOTES_YOU_MUST_SELECT: &str = "You haven't selected any notes to delete.";

/// Delete a selection of notes one by one.
#[derive(Clone)]
pub struct DeleteMultipleNotes {
    stores: NoteStores,
}

impl DeleteMultipleNotes {
    pub const fn new(stores: NoteStores) -> Self {
        Self { stores }
    }

    /// Every note is attempted even after a failure. The payload lists the
    /// notes that were deleted; only those are removed remotely.
    pub async fn delete_notes(&self, notes: &[Note]) -> DataState<Vec<Note>> {
        let event = StateEvent::DeleteMultipleNotes;
        if notes.is_empty() {
            return DataState::data(
                Response::new(
                    DELETE_NOTES_YOU_MUST_SELECT,
                    UiComponentType::Toast,
                    MessageType::Info,
                ),
                None,
                event,
            );
        }

        let mut deleted = Vec::with_capacity(notes.len());
        let mut had_errors = false;
        for note in notes {
            let result = safe_cache_call(
                self.stores.timeouts.cache,
                self.stores.cache.delete_note(&note.id),
            )
            .await;
            match result {
                Ok(rows) if rows > 0 => deleted.push(note.clone()),
                Ok(_) => had_errors = true,
                Err(error) => {
                    tracing::warn!(note_id = %note.id, "Failed to delete note: {error}");
                    had_errors = true;
                }
            }
        }

        for note in &deleted {
            self.stores.writer.enqueue(NetworkOp::Delete(note.id.clone()));
        }
        if !deleted.is_empty() {
            self.stores
                .writer
                .enqueue(NetworkOp::InsertTombstones(deleted.clone()));
        }

        let response = if had_errors {
            Response::new(DELETE_NOTES_ERRORS, UiComponentType::Dialog, MessageType::Info)
        } else {
            Response::new(
                DELETE_NOTES_SUCCESS,
                UiComponentType::Toast,
                MessageType::Success,
            )
        };
        DataState::data(response, Some(deleted), event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoteCacheDataSource;
    use crate::interactors::fixtures::Harness;
    use crate::models::NoteFactory;
    use crate::network::NoteNetworkDataSource;
    use crate::testing::{forced_id, FORCE_EXCEPTION, FORCE_GENERAL_FAILURE};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn delete_notes_success_confirm_network_and_cache_updated() {
        let notes = NoteFactory::new().create_note_list(4);
        let harness = Harness::new(notes.clone(), notes.clone(), Vec::new());
        let interactor = DeleteMultipleNotes::new(harness.stores.clone());

        let state = interactor.delete_notes(&notes[..3]).await;

        assert_eq!(state.message(), DELETE_NOTES_SUCCESS);
        assert_eq!(state.into_data().map(|d| d.len()), Some(3));
        assert_eq!(harness.cache.get_num_notes().await.unwrap(), 1);

        harness.flush().await;
        assert_eq!(
            harness.network.get_all_notes().await.unwrap(),
            vec![notes[3].clone()]
        );
        assert_eq!(harness.network.get_deleted_notes().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_some_notes_confirm_only_valid_removed_remotely() {
        let factory = NoteFactory::new();
        let good = factory.create_note_list(2);
        let missing = factory.create_single_note(Some(forced_id(FORCE_GENERAL_FAILURE)), "x", None);
        let broken = factory.create_single_note(Some(forced_id(FORCE_EXCEPTION)), "y", None);
        let harness = Harness::new(good.clone(), good.clone(), Vec::new());
        let interactor = DeleteMultipleNotes::new(harness.stores.clone());

        let selection = vec![good[0].clone(), missing, broken, good[1].clone()];
        let state = interactor.delete_notes(&selection).await;

        assert_eq!(state.message(), DELETE_NOTES_ERRORS);
        assert_eq!(state.into_data(), Some(good.clone()));

        harness.flush().await;
        let mut tombstones = harness.network.get_deleted_notes().await.unwrap();
        tombstones.sort_by(|a, b| a.id.cmp(&b.id));
        let mut expected = good;
        expected.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(tombstones, expected);
        assert!(harness.network.get_all_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_selection_asks_for_a_selection() {
        let harness = Harness::empty();
        let interactor = DeleteMultipleNotes::new(harness.stores.clone());

        let state = interactor.delete_notes(&[]).await;

        assert_eq!(state.message(), DELETE_NOTES_YOU_MUST_SELECT);
        assert_eq!(state.message_type(), MessageType::Info);
    }
}
