//! Jotter CLI - offline-first notes from the command line
//!
//! Notes are written to the local cache first and mirrored to the configured
//! remote in the background. `jotter sync` reconciles both sides.

mod cli;
mod commands;
mod error;


use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::Context;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::count::run_count;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::restore::run_restore;
use crate::commands::search::run_search;
use crate::commands::show::run_show;
use crate::commands::sync::run_sync;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "jotter=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // completions need no config or cache
    if let Some(Commands::Completions { shell, output }) = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let context = Context::load(cli.db_path, cli.config)?;

    match cli.command {
        Some(Commands::Add { title, body, id }) => {
            run_add(&title, body, id.as_deref(), &context).await?;
        }
        Some(Commands::List { page, order, json }) => {
            run_list(page, &order, json, &context).await?;
        }
        Some(Commands::Search {
            query,
            page,
            order,
            json,
        }) => run_search(&query, page, &order, json, &context).await?,
        Some(Commands::Show { id, json }) => run_show(&id, json, &context).await?,
        Some(Commands::Edit { id, title, body }) => {
            run_edit(&id, title, body, &context).await?;
        }
        Some(Commands::Delete { ids }) => run_delete(&ids, &context).await?,
        Some(Commands::Restore { id }) => run_restore(&id, &context).await?,
        Some(Commands::Count) => run_count(&context).await?,
        Some(Commands::Sync { json }) => run_sync(json, &context).await?,
        Some(Commands::Config { command }) => run_config(command, &context)?,
        Some(Commands::Completions { .. }) => {}
        None => {
            // Quick capture mode: jotter "my note title"
            if cli.note.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                run_add(&cli.note, None, None, &context).await?;
            }
        }
    }

    Ok(())
}
