use crate::commands::common::{note_to_list_item, resolve_note, Context};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, context: &Context) -> Result<(), CliError> {
    let service = context.open_service()?;
    let note = resolve_note(id, &service).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note_to_list_item(&note))?);
        return Ok(());
    }

    println!("{}", note.title);
    if let Some(body) = note.body.as_deref().filter(|body| !body.trim().is_empty()) {
        println!();
        println!("{body}");
    }
    println!();
    println!("id:      {}", note.id);
    println!("created: {}", note.created_at);
    println!("updated: {}", note.updated_at);
    Ok(())
}
