use super::NoteStores;
use crate::cache::NoteOrder;
use crate::models::Note;
use crate::services::{handle_cache_result, safe_cache_call};
use crate::state::{DataState, MessageType, Response, StateEvent, UiComponentType};

pub const SEARCH_NOTES_SUCCESS: &str = "Successfully retrieved list of notes.";
pub const SEARCH_NOTES_NO_MATCHING_RESULTS: &str = "There are no notes that match that query.";

/// Filter, order and page the cached notes. Read-only.
#[derive(Clone)]
pub struct SearchNotes {
    stores: NoteStores,
}

impl SearchNotes {
    pub const fn new(stores: NoteStores) -> Self {
        Self { stores }
    }

    /// Pages are cumulative and start at 1; lower values are clamped.
    pub async fn search_notes(
        &self,
        query: &str,
        order: NoteOrder,
        page: u32,
    ) -> DataState<Vec<Note>> {
        let page = page.max(1);
        let result = safe_cache_call(
            self.stores.timeouts.cache,
            self.stores.cache.search_notes(query, order, page),
        )
        .await;

        handle_cache_result(result, StateEvent::SearchNotes, |notes, event| {
            let response = if notes.is_empty() {
                Response::new(
                    SEARCH_NOTES_NO_MATCHING_RESULTS,
                    UiComponentType::Toast,
                    MessageType::Success,
                )
            } else {
                Response::new(
                    SEARCH_NOTES_SUCCESS,
                    UiComponentType::None,
                    MessageType::Success,
                )
            };
            DataState::data(response, Some(notes), event)
        })
    }
}
