use jotter_core::config::CONFIG_KEYS;

use crate::cli::ConfigCommands;
use crate::commands::common::Context;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, context: &Context) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            for line in format_config_lines(context)? {
                println!("{line}");
            }
        }
        ConfigCommands::Path => println!("{}", context.config_path.display()),
        ConfigCommands::Get { key } => {
            let value = context.config.get(&key)?;
            println!("{}", value.unwrap_or_default());
        }
        ConfigCommands::Set { key, value } => update_config(context, &key, &value)?,
        ConfigCommands::Unset { key } => update_config(context, &key, "")?,
    }
    Ok(())
}

pub fn format_config_lines(context: &Context) -> Result<Vec<String>, CliError> {
    let mut lines = Vec::with_capacity(CONFIG_KEYS.len() + 1);
    for key in CONFIG_KEYS {
        let value = context.config.get(key)?.unwrap_or_else(|| "-".to_string());
        lines.push(format!("{key:<20} {value}"));
    }
    if context.config.db_path.is_none() {
        lines.push(format!("{:<20} {}", "(cache in use)", context.db_path.display()));
    }
    Ok(lines)
}

/// Edits are applied to the file contents, not to the env-overridden view.
fn update_config(context: &Context, key: &str, value: &str) -> Result<(), CliError> {
    let mut stored = jotter_core::JotterConfig::load_from_path(&context.config_path)?;
    stored
        .set(key, value)
        .map_err(|error| CliError::Config(error.to_string()))?;
    stored.save_to_path(&context.config_path)?;

    let shown = stored.get(key)?.unwrap_or_else(|| "(default)".to_string());
    println!("{key} = {shown}");
    Ok(())
}
