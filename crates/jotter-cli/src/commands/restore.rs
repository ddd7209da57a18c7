use jotter_core::NoteId;

use crate::commands::common::{
    finish_state, flush_remote_writes, normalize_note_identifier, Context,
};
use crate::error::CliError;

pub async fn run_restore(id: &str, context: &Context) -> Result<(), CliError> {
    let note_id = normalize_note_identifier(id)?.parse::<NoteId>()?;
    let service = context.open_service()?;
    if !service.has_remote() {
        return Err(CliError::SyncNotConfigured);
    }

    let Some(tombstone) = service.find_deleted_note(&note_id).await? else {
        return Err(CliError::DeletedNoteNotFound(note_id.to_string()));
    };

    let state = service
        .interactors()
        .restore_deleted_note
        .restore_deleted_note(&tombstone)
        .await;
    let restored = finish_state(state)?;
    flush_remote_writes(&service).await;

    println!("{}", restored.map_or(note_id, |note| note.id));
    Ok(())
}
