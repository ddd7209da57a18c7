use jotter_core::NoteId;

use crate::commands::common::{finish_state, flush_remote_writes, resolve_new_note, Context};
use crate::error::CliError;

pub async fn run_add(
    title_parts: &[String],
    body: Option<String>,
    id: Option<&str>,
    context: &Context,
) -> Result<(), CliError> {
    let id = id.map(str::parse::<NoteId>).transpose()?;
    let (title, body) = resolve_new_note(title_parts, body)?;

    let service = context.open_service()?;
    let state = service
        .interactors()
        .insert_new_note
        .insert_new_note(id, &title, body)
        .await;
    let note = finish_state(state)?;
    flush_remote_writes(&service).await;

    if let Some(note) = note {
        println!("{}", note.id);
    }
    Ok(())
}
