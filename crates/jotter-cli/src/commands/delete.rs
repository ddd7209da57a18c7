use crate::commands::common::{finish_state, flush_remote_writes, resolve_note, Context};
use crate::error::CliError;

pub async fn run_delete(ids: &[String], context: &Context) -> Result<(), CliError> {
    let service = context.open_service()?;
    let mut notes = Vec::with_capacity(ids.len());
    for id in ids {
        let note = resolve_note(id, &service).await?;
        if !notes.contains(&note) {
            notes.push(note);
        }
    }

    let deleted = if let [note] = notes.as_slice() {
        let state = service.interactors().delete_note.delete_note(note).await;
        finish_state(state)?.into_iter().collect::<Vec<_>>()
    } else {
        let state = service
            .interactors()
            .delete_multiple_notes
            .delete_notes(&notes)
            .await;
        finish_state(state)?.unwrap_or_default()
    };
    flush_remote_writes(&service).await;

    for note in deleted {
        println!("{}", note.id);
    }
    Ok(())
}
