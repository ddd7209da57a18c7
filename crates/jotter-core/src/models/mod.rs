//! Data models for Jotter

mod factory;
mod note;
mod sync_report;
mod timestamp;

pub use factory::NoteFactory;
pub use note::{Note, NoteId};
pub use sync_report::SyncReport;
pub use timestamp::Timestamp;
