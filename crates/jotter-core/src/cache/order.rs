//! Sort orders accepted by cache searches

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Note;

/// Sort order for search results.
///
/// Parsed from the wire strings clients pass around (`"-updated_at"`,
/// `"title"`, ...). A leading `-` means descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteOrder {
    CreatedAsc,
    CreatedDesc,
    UpdatedAsc,
    #[default]
    UpdatedDesc,
    TitleAsc,
    TitleDesc,
}

impl NoteOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAsc => "created_at",
            Self::CreatedDesc => "-created_at",
            Self::UpdatedAsc => "updated_at",
            Self::UpdatedDesc => "-updated_at",
            Self::TitleAsc => "title",
            Self::TitleDesc => "-title",
        }
    }

    /// `ORDER BY` clause for the notes table.
    pub(crate) const fn sql(self) -> &'static str {
        match self {
            Self::CreatedAsc => "created_at ASC, id ASC",
            Self::CreatedDesc => "created_at DESC, id ASC",
            Self::UpdatedAsc => "updated_at ASC, id ASC",
            Self::UpdatedDesc => "updated_at DESC, id ASC",
            Self::TitleAsc => "jotter_lower(title) ASC, id ASC",
            Self::TitleDesc => "jotter_lower(title) DESC, id ASC",
        }
    }

    /// Comparator matching [`Self::sql`] for in-memory stores.
    pub(crate) fn compare(self, a: &Note, b: &Note) -> Ordering {
        let primary = match self {
            Self::CreatedAsc => a.created_at.cmp(&b.created_at),
            Self::CreatedDesc => b.created_at.cmp(&a.created_at),
            Self::UpdatedAsc => a.updated_at.cmp(&b.updated_at),
            Self::UpdatedDesc => b.updated_at.cmp(&a.updated_at),
            Self::TitleAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            Self::TitleDesc => b.title.to_lowercase().cmp(&a.title.to_lowercase()),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl fmt::Display for NoteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteOrder {
    type Err = std::convert::Infallible;

    /// Unknown strings fall back to newest-updated first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "created_at" => Self::CreatedAsc,
            "-created_at" => Self::CreatedDesc,
            "updated_at" => Self::UpdatedAsc,
            "title" => Self::TitleAsc,
            "-title" => Self::TitleDesc,
            _ => Self::UpdatedDesc,
        })
    }
}
