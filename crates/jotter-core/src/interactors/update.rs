use super::NoteStores;
use crate::models::{Note, Timestamp};
use crate::services::{handle_cache_result, safe_cache_call, NetworkOp};
use crate::state::{DataState, MessageType, Response, StateEvent, UiComponentType};

pub const UPDATE_NOTE_SUCCESS: &str = "Successfully updated note.";
pub const UPDATE_NOTE_FAILED: &str = "Failed to update note.";

/// Save edits to a note's title and body.
#[derive(Clone)]
pub struct UpdateNote {
    stores: NoteStores,
}

impl UpdateNote {
    pub const fn new(stores: NoteStores) -> Self {
        Self { stores }
    }

    /// Write `note`'s title and body to the cache, stamping `updated_at` with
    /// the current time, then upsert the stamped note remotely.
    pub async fn update_note(&self, note: &Note) -> DataState<Note> {
        let mut updated = note.clone();
        updated.updated_at = Timestamp::now();

        let result = safe_cache_call(
            self.stores.timeouts.cache,
            self.stores.cache.update_note(
                &updated.id,
                &updated.title,
                updated.body.as_deref(),
                updated.updated_at,
            ),
        )
        .await;

        let state = handle_cache_result(result, StateEvent::UpdateNote, |rows, event| {
            if rows > 0 {
                DataState::data(
                    Response::new(
                        UPDATE_NOTE_SUCCESS,
                        UiComponentType::Toast,
                        MessageType::Success,
                    ),
                    Some(updated.clone()),
                    event,
                )
            } else {
                DataState::data(
                    Response::new(
                        UPDATE_NOTE_FAILED,
                        UiComponentType::Toast,
                        MessageType::Error,
                    ),
                    None,
                    event,
                )
            }
        });

        if state.is_success() {
            self.stores.writer.enqueue(NetworkOp::Upsert(updated));
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

    fn old_note() -> Note {
        let mut note = NoteFactory::new().create_single_note(None, "before", Some("old".into()));
        let earlier = Timestamp::from_millis(1_600_000_000_000).unwrap();
        note.created_at = earlier;
        note.updated_at = earlier;
        note
    }

    #[tokio::test]
    async fn update_note_success_confirm_network_and_cache_updated() {
        let original = old_note();
        let harness = Harness::new(vec![original.clone()], vec![original.clone()], Vec::new());
        let interactor = UpdateNote::new(harness.stores.clone());

        let mut edited = original.clone();
        edited.title = "after".into();
        edited.body = Some("new".into());
        let state = interactor.update_note(&edited).await;

        assert_eq!(state.message(), UPDATE_NOTE_SUCCESS);
        let saved = state.into_data().unwrap();
        assert!(saved.is_newer_than(&original));
        assert_eq!(saved.created_at, original.created_at);

        let cached = harness
            .cache
            .search_note_by_id(&original.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached, saved);

        harness.flush().await;
        assert_eq!(
            harness.network.search_note(&original).await.unwrap(),
            Some(saved)
        );
    }

    #[tokio::test]
    async fn update_missing_note_fail_confirm_network_unchanged() {
        let harness = Harness::empty();
        let interactor = UpdateNote::new(harness.stores.clone());

        let state = interactor.update_note(&old_note()).await;

        assert_eq!(state.message(), UPDATE_NOTE_FAILED);
        assert!(!state.is_success());
        harness.flush().await;
        assert!(harness.network.get_all_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn throw_exception_check_generic_error() {
        let mut note = old_note();
        note.id = forced_id(FORCE_EXCEPTION);
        let harness = Harness::empty();
        let interactor = UpdateNote::new(harness.stores.clone());

        let state = interactor.update_note(&note).await;

        assert!(matches!(state, DataState::Error { .. }));
        assert!(state.message().starts_with("Error updating note."));
        assert!(state.message().contains(CACHE_ERROR_UNKNOWN));
    }
}
