//! Result envelope returned by interactors.
//!
//! Every use case answers with a [`DataState`]: either data (with an optional
//! payload) or an error, each carrying a user-facing [`Response`] and the
//! [`StateEvent`] that produced it.

use std::fmt;

/// Severity of a response message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
    Info,
    None,
}

/// How a client should surface a response message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiComponentType {
    Toast,
    Dialog,
    None,
}

/// User-facing message with a display hint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub message: String,
    pub ui_component: UiComponentType,
    pub message_type: MessageType,
}

impl Response {
    pub fn new(
        message: impl Into<String>,
        ui_component: UiComponentType,
        message_type: MessageType,
    ) -> Self {
        Self {
            message: message.into(),
            ui_component,
            message_type,
        }
    }
}

/// The use case a result belongs to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateEvent {
    InsertNewNote { title: String },
    UpdateNote,
    DeleteNote,
    DeleteMultipleNotes,
    RestoreDeletedNote,
    SearchNotes,
    GetNumNotesInCache,
}

impl StateEvent {
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::InsertNewNote { .. } => "InsertNewNoteEvent",
            Self::UpdateNote => "UpdateNoteEvent",
            Self::DeleteNote => "DeleteNoteEvent",
            Self::DeleteMultipleNotes => "DeleteMultipleNotesEvent",
            Self::RestoreDeletedNote => "RestoreDeletedNoteEvent",
            Self::SearchNotes => "SearchNotesEvent",
            Self::GetNumNotesInCache => "GetNumNotesInCacheEvent",
        }
    }

    /// Prefix for error messages raised while handling this event
    pub const fn error_info(&self) -> &'static str {
        match self {
            Self::InsertNewNote { .. } => "Error inserting new note.",
            Self::UpdateNote => "Error updating note.",
            Self::DeleteNote => "Error deleting note.",
            Self::DeleteMultipleNotes => "Error deleting the selected notes.",
            Self::RestoreDeletedNote => "Error restoring the deleted note.",
            Self::SearchNotes => "Error getting list of notes.",
            Self::GetNumNotesInCache => "Error getting the number of notes from the cache.",
        }
    }

    pub const fn should_display_progress_bar(&self) -> bool {
        !matches!(self, Self::GetNumNotesInCache)
    }
}

impl fmt::Display for StateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Outcome of an interactor call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataState<T> {
    Data {
        response: Response,
        data: Option<T>,
        event: StateEvent,
    },
    Error {
        response: Response,
        event: StateEvent,
    },
}

impl<T> DataState<T> {
    pub const fn data(response: Response, data: Option<T>, event: StateEvent) -> Self {
        Self::Data {
            response,
            data,
            event,
        }
    }

    pub const fn error(response: Response, event: StateEvent) -> Self {
        Self::Error { response, event }
    }

    pub const fn response(&self) -> &Response {
        match self {
            Self::Data { response, .. } | Self::Error { response, .. } => response,
        }
    }

    pub fn message(&self) -> &str {
        &self.response().message
    }

    pub const fn message_type(&self) -> MessageType {
        self.response().message_type
    }

    pub const fn event(&self) -> &StateEvent {
        match self {
            Self::Data { event, .. } | Self::Error { event, .. } => event,
        }
    }

    /// True for data results whose message is not an error.
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Data { response, .. } if !matches!(response.message_type, MessageType::Error)
        )
    }

    pub const fn data_ref(&self) -> Option<&T> {
        match self {
            Self::Data { data, .. } => data.as_ref(),
            Self::Error { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data { data, .. } => data,
            Self::Error { .. } => None,
        }
    }
}
