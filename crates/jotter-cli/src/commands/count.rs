use crate::commands::common::{finish_state, Context};
use crate::error::CliError;

pub async fn run_count(context: &Context) -> Result<(), CliError> {
    let service = context.open_service()?;
    let state = service.interactors().get_num_notes.get_num_notes().await;
    println!("{}", finish_state(state)?.unwrap_or_default());
    Ok(())
}
