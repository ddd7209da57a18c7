use crate::commands::common::{normalize_search_query, Context};
use crate::commands::list::{print_notes, search_page};
use crate::error::CliError;

pub async fn run_search(
    query: &str,
    page: u32,
    order: &str,
    as_json: bool,
    context: &Context,
) -> Result<(), CliError> {
    let normalized_query = normalize_search_query(query)?;
    let notes = search_page(&normalized_query, page, order, context).await?;
    print_notes(&notes, as_json)
}
