//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::Timestamp;
use crate::error::Error;

/// A unique identifier for a note.
///
/// Identifiers are opaque strings so notes created by other clients keep
/// whatever id they were given. Locally generated ids are UUID v7
/// (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Create a new unique note ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("Note ID cannot be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// A note in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Title line
    pub title: String,
    /// Free-form body
    #[serde(default)]
    pub body: Option<String>,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last update timestamp
    pub updated_at: Timestamp,
}

impl Note {
    /// Returns true when this version was updated strictly after `other`.
    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.updated_at > other.updated_at
    }

    /// Title truncated to `max_len` characters
    #[must_use]
    pub fn title_preview(&self, max_len: usize) -> String {
        self.title.chars().take(max_len).collect()
    }

    /// Case-insensitive substring match against title and body.
    ///
    /// An empty query matches every note.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self
                .body
                .as_deref()
                .is_some_and(|body| body.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, body: Option<&str>, updated_ms: i64) -> Note {
        Note {
            id: NoteId::new(),
            title: title.to_string(),
            body: body.map(str::to_string),
            created_at: Timestamp::from_millis(0).unwrap(),
            updated_at: Timestamp::from_millis(updated_ms).unwrap(),
        }
    }

    #[test]
    fn test_note_id_unique() {
        let id1 = NoteId::new();
        let id2 = NoteId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_note_id_parse() {
        let id = NoteId::new();
        let parsed: NoteId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_note_id_accepts_foreign_ids() {
        let parsed: NoteId = " 3f2c-legacy ".parse().unwrap();
        assert_eq!(parsed.as_str(), "3f2c-legacy");
    }

    #[test]
    fn test_note_id_rejects_blank() {
        assert!("   ".parse::<NoteId>().is_err());
    }

    #[test]
    fn test_is_newer_than_is_strict() {
        let older = note("a", None, 1_000);
        let newer = note("a", None, 2_000);
        let same = note("a", None, 2_000);
        assert!(newer.is_newer_than(&older));
        assert!(!older.is_newer_than(&newer));
        assert!(!same.is_newer_than(&newer));
    }

    #[test]
    fn test_matches_title_and_body() {
        let n = note("Groceries", Some("Buy OAT milk"), 0);
        assert!(n.matches("grocer"));
        assert!(n.matches("oat"));
        assert!(n.matches(""));
        assert!(!n.matches("bread"));
    }

    #[test]
    fn test_title_preview() {
        let n = note("First line title", None, 0);
        assert_eq!(n.title_preview(5), "First");
    }

    #[test]
    fn test_json_shape() {
        let n = note("t", None, 0);
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["id"], n.id.as_str());
        assert_eq!(value["created_at"], "1970-01-01T00:00:00.000Z");
        assert!(value["body"].is_null());
    }
}
