use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "jotter")]
#[command(about = "Offline-first notes with background sync")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local cache database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Quick capture: jotter "my note title"
    #[arg(trailing_var_arg = true)]
    pub note: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        title: Vec<String>,
        /// Note body (read from stdin when piped)
        #[arg(short, long)]
        body: Option<String>,
        /// Use this id instead of generating one
        #[arg(long, value_name = "ID")]
        id: Option<String>,
    },
    /// List notes
    #[command(alias = "ls")]
    List {
        /// Page to show; pages are cumulative
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Sort order: created_at, updated_at, title (prefix with - for descending)
        #[arg(short, long, default_value = "-updated_at", allow_hyphen_values = true)]
        order: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search notes by title or body
    Search {
        /// Search query
        query: String,
        /// Page to show; pages are cumulative
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Sort order: created_at, updated_at, title (prefix with - for descending)
        #[arg(short, long, default_value = "-updated_at", allow_hyphen_values = true)]
        order: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show {
        /// Note ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing note (opens $EDITOR unless --title/--body are given)
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Delete one or more notes
    #[command(alias = "rm")]
    Delete {
        /// Note IDs or unique ID prefixes
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Restore a deleted note from the remote tombstones
    Restore {
        /// Full ID of the deleted note
        id: String,
    },
    /// Show how many notes are cached locally
    Count,
    /// Reconcile the local cache with the remote store
    Sync {
        /// Output the sync report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print every setting
    Show,
    /// Print the config file location
    Path,
    /// Print one setting
    Get {
        /// Setting name
        key: String,
    },
    /// Change one setting
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
    /// Reset one setting to its default
    Unset {
        /// Setting name
        key: String,
    },
}
