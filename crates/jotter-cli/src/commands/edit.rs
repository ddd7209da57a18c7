use jotter_core::Note;

use crate::commands::common::{
    capture_editor_input_with_initial, finish_state, flush_remote_writes, join_note_text,
    resolve_note, split_note_text, Context,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title: Option<String>,
    body: Option<String>,
    context: &Context,
) -> Result<(), CliError> {
    let service = context.open_service()?;
    let note = resolve_note(id, &service).await?;

    let edited = if title.is_some() || body.is_some() {
        apply_flags(&note, title, body)
    } else {
        edit_in_editor(&note)?
    };
    if edited.title.trim().is_empty() {
        return Err(CliError::EmptyEditedTitle);
    }

    if edited.title == note.title && edited.body == note.body {
        println!("{}", note.id);
        return Ok(());
    }

    let state = service.interactors().update_note.update_note(&edited).await;
    let updated = finish_state(state)?;
    flush_remote_writes(&service).await;

    println!("{}", updated.map_or(note.id, |note| note.id));
    Ok(())
}

/// An empty `--body` clears the body.
pub fn apply_flags(note: &Note, title: Option<String>, body: Option<String>) -> Note {
    let mut edited = note.clone();
    if let Some(title) = title {
        edited.title = title.trim().to_string();
    }
    if let Some(body) = body {
        edited.body = Some(body.trim().to_string());
    }
    edited
}

fn edit_in_editor(note: &Note) -> Result<Note, CliError> {
    let initial = join_note_text(&note.title, note.body.as_deref());
    let Some(text) = capture_editor_input_with_initial(&initial)? else {
        return Err(CliError::EmptyEditedTitle);
    };

    let (title, body) = split_note_text(&text);
    let mut edited = note.clone();
    edited.title = title;
    // an emptied body clears the note's body rather than dropping the field
    edited.body = body.or_else(|| note.body.as_ref().map(|_| String::new()));
    Ok(edited)
}
