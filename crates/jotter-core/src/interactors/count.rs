use super::NoteStores;
use crate::services::{handle_cache_result, safe_cache_call};
use crate::state::{DataState, MessageType, Response, StateEvent, UiComponentType};

pub const GET_NUM_NOTES_SUCCESS: &str =
    "Successfully retrieved the number of notes from the cache.";

/// Count the cached notes.
#[derive(Clone)]
pub struct GetNumNotes {
    stores: NoteStores,
}

impl GetNumNotes {
    pub const fn new(stores: NoteStores) -> Self {
        Self { stores }
    }

    pub async fn get_num_notes(&self) -> DataState<u64> {
        let result = safe_cache_call(
            self.stores.timeouts.cache,
            self.stores.cache.get_num_notes(),
        )
        .await;

        handle_cache_result(result, StateEvent::GetNumNotesInCache, |count, event| {
            DataState::data(
                Response::new(
                    GET_NUM_NOTES_SUCCESS,
                    UiComponentType::None,
                    MessageType::Success,
                ),
                Some(count),
                event,
            )
        })
    }
}
