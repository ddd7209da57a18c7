//! Note construction

use super::{Note, NoteId, Timestamp};

/// Builds notes with generated identifiers and timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteFactory;

impl NoteFactory {
    pub const fn new() -> Self {
        Self
    }

    /// Create a note, generating an id when none is given.
    ///
    /// `created_at` and `updated_at` are both set to the current time.
    pub fn create_single_note(
        &self,
        id: Option<NoteId>,
        title: impl Into<String>,
        body: Option<String>,
    ) -> Note {
        let now = Timestamp::now();
        Note {
            id: id.unwrap_or_default(),
            title: title.into(),
            body,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create `count` sample notes with distinct titles.
    pub fn create_note_list(&self, count: usize) -> Vec<Note> {
        (0..count)
            .map(|index| {
                self.create_single_note(
                    None,
                    format!("Note {index}"),
                    Some(format!("Body of note {index}")),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_id_and_timestamps() {
        let note = NoteFactory::new().create_single_note(None, "hello", None);
        assert!(!note.id.as_str().is_empty());
        assert_eq!(note.title, "hello");
        assert_eq!(note.body, None);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn keeps_given_id() {
        let id: NoteId = "fixed-id".parse().unwrap();
        let note =
            NoteFactory::new().create_single_note(Some(id.clone()), "t", Some(String::new()));
        assert_eq!(note.id, id);
        assert_eq!(note.body.as_deref(), Some(""));
    }

    #[test]
    fn note_list_has_unique_ids() {
        let notes = NoteFactory::new().create_note_list(5);
        assert_eq!(notes.len(), 5);
        let mut ids: Vec<_> = notes.iter().map(|n| n.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
