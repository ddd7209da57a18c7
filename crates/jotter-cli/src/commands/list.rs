use jotter_core::{Note, NoteOrder};

use crate::commands::common::{
    finish_state, format_note_lines, note_to_list_item, Context, NoteListItem,
};
use crate::error::CliError;

/// `list` is a search with an empty query.
pub async fn run_list(
    page: u32,
    order: &str,
    as_json: bool,
    context: &Context,
) -> Result<(), CliError> {
    let notes = search_page("", page, order, context).await?;
    print_notes(&notes, as_json)
}

pub async fn search_page(
    query: &str,
    page: u32,
    order: &str,
    context: &Context,
) -> Result<Vec<Note>, CliError> {
    let order = order.parse::<NoteOrder>().unwrap_or_default();
    let service = context.open_service()?;
    let state = service
        .interactors()
        .search_notes
        .search_notes(query, order, page)
        .await;
    Ok(finish_state(state)?.unwrap_or_default())
}

pub fn print_notes(notes: &[Note], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let json_items = notes
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_note_lines(notes) {
            println!("{line}");
        }
    }

    Ok(())
}
