use super::NoteStores;
use crate::models::{Note, NoteFactory, NoteId};
use crate::services::{handle_cache_result, safe_cache_call, NetworkOp};
use crate::state::{DataState, MessageType, Response, StateEvent, UiComponentType};

pub const INSERT_NOTE_SUCCESS: &str = "Successfully inserted new note.";
pub const INSERT_NOTE_FAILED: &str = "Failed to insert new note.";

/// Create a note in the cache, then upsert it remotely.
#[derive(Clone)]
pub struct InsertNewNote {
    stores: NoteStores,
    factory: NoteFactory,
}

impl InsertNewNote {
    pub const fn new(stores: NoteStores) -> Self {
        Self {
            stores,
            factory: NoteFactory::new(),
        }
    }

    /// Insert a new note. An id is generated when none is given; a missing
    /// body is stored as empty text.
    pub async fn insert_new_note(
        &self,
        id: Option<NoteId>,
        title: &str,
        body: Option<String>,
    ) -> DataState<Note> {
        let note = self
            .factory
            .create_single_note(id, title, Some(body.unwrap_or_default()));
        let event = StateEvent::InsertNewNote {
            title: title.to_string(),
        };

        let result = safe_cache_call(
            self.stores.timeouts.cache,
            self.stores.cache.insert_note(&note),
        )
        .await;

        let state = handle_cache_result(result, event, |rows, event| {
            if rows > 0 {
                DataState::data(
                    Response::new(
                        INSERT_NOTE_SUCCESS,
                        UiComponentType::Toast,
                        MessageType::Success,
                    ),
                    Some(note.clone()),
                    event,
                )
            } else {
                DataState::error(
                    Response::new(
                        INSERT_NOTE_FAILED,
                        UiComponentType::Toast,
                        MessageType::Error,
                    ),
                    event,
                )
            }
        });

        if state.is_success() {
            self.stores.writer.enqueue(NetworkOp::Upsert(note));
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoteCacheDataSource;
    use crate::interactors::fixtures::Harness;
    use crate::network::NoteNetworkDataSource;
    use crate::services::CACHE_ERROR_UNKNOWN;
    use crate::testing::{forced_id, FORCE_EXCEPTION, FORCE_GENERAL_FAILURE};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn insert_note_success_confirm_network_and_cache_updated() {
        let harness = Harness::empty();
        let interactor = InsertNewNote::new(harness.stores.clone());
        let id = NoteId::new();

        let state = interactor
            .insert_new_note(Some(id.clone()), "new note title", None)
            .await;

        assert_eq!(state.message(), INSERT_NOTE_SUCCESS);
        assert_eq!(state.response().ui_component, UiComponentType::Toast);
        let inserted = state.into_data().unwrap();
        assert_eq!(inserted.id, id);
        assert_eq!(inserted.body.as_deref(), Some(""));

        let cached = harness.cache.search_note_by_id(&id).await.unwrap();
        assert_eq!(cached, Some(inserted.clone()));

        harness.flush().await;
        assert_eq!(
            harness.network.search_note(&inserted).await.unwrap(),
            Some(inserted)
        );
    }

    #[tokio::test]
    async fn insert_note_fail_confirm_network_and_cache_unchanged() {
        let harness = Harness::empty();
        let interactor = InsertNewNote::new(harness.stores.clone());

        let state = interactor
            .insert_new_note(Some(forced_id(FORCE_GENERAL_FAILURE)), "t", None)
            .await;

        assert_eq!(state.message(), INSERT_NOTE_FAILED);
        assert_eq!(state.message_type(), MessageType::Error);
        assert_eq!(harness.cache.get_num_notes().await.unwrap(), 0);

        harness.flush().await;
        assert!(harness.network.get_all_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn throw_exception_check_generic_error() {
        let harness = Harness::empty();
        let interactor = InsertNewNote::new(harness.stores.clone());

        let state = interactor
            .insert_new_note(Some(forced_id(FORCE_EXCEPTION)), "t", None)
            .await;

        assert!(matches!(state, DataState::Error { .. }));
        assert!(state.message().contains(CACHE_ERROR_UNKNOWN));
        assert!(state.message().starts_with("Error inserting new note."));

        harness.flush().await;
        assert!(harness.network.get_all_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn network_failure_does_not_flip_cache_success() {
        let harness = Harness::empty();
        harness.network.set_failing(true);
        let interactor = InsertNewNote::new(harness.stores.clone());

        let state = interactor
            .insert_new_note(None, "offline", Some("body".into()))
            .await;

        assert!(state.is_success());
        harness.flush().await;
        assert_eq!(harness.stores.writer.failed_writes(), 1);
        assert_eq!(harness.cache.get_num_notes().await.unwrap(), 1);
    }
}
