use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use jotter_core::{
    DataState, JotterConfig, MessageType, Note, NoteId, NotesService, UiComponentType,
};
use serde::Serialize;

use crate::error::CliError;

const SHORT_ID_LEN: usize = 13;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub preview: String,
    pub created_at: String,
    pub updated_at: String,
    pub relative_time: String,
}

/// Settings plus the resolved locations a command runs against.
pub struct Context {
    pub config: JotterConfig,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
}

impl Context {
    pub fn load(
        cli_db_path: Option<PathBuf>,
        cli_config: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        let config_path = cli_config.unwrap_or_else(default_config_path);
        let mut config = JotterConfig::load_from_path(&config_path)?;
        config.apply_env_overrides(|key| env::var(key).ok());
        let db_path = resolve_db_path(cli_db_path, &config);
        Ok(Self {
            config,
            config_path,
            db_path,
        })
    }

    pub fn open_service(&self) -> Result<NotesService, CliError> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(NotesService::open(&self.db_path, &self.config)?)
    }
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>, config: &JotterConfig) -> PathBuf {
    cli_db_path
        .or_else(|| config.db_path.clone())
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jotter")
        .join("jotter.db")
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jotter")
        .join("config.json")
}

/// Turn an interactor result into the command outcome.
///
/// Successful results print their message unless the interactor asked for no
/// UI. Anything flagged as an error becomes a [`CliError::Rejected`].
pub fn finish_state<T>(state: DataState<T>) -> Result<Option<T>, CliError> {
    if !state.is_success() {
        return Err(CliError::Rejected(state.message().to_string()));
    }
    let response = state.response();
    if response.ui_component != UiComponentType::None && response.message_type != MessageType::None
    {
        eprintln!("{}", response.message);
    }
    Ok(state.into_data())
}

/// Wait for queued remote writes before the process exits.
pub async fn flush_remote_writes(service: &NotesService) {
    if !service.has_remote() {
        return;
    }
    let failed = service.flush().await;
    if failed > 0 {
        tracing::warn!("{failed} remote write(s) failed; run `jotter sync` to reconcile");
    }
}

pub async fn resolve_note(query: &str, service: &NotesService) -> Result<Note, CliError> {
    let normalized = normalize_note_identifier(query)?;
    if let Ok(note_id) = normalized.parse::<NoteId>() {
        if let Some(note) = service.find_note(&note_id).await? {
            return Ok(note);
        }
    }

    let mut matching = service
        .cache()
        .get_all_notes()
        .await?
        .into_iter()
        .filter(|note| note.id.as_str().starts_with(&normalized))
        .collect::<Vec<_>>();

    match matching.len() {
        0 => Err(CliError::NoteNotFound(normalized)),
        1 => Ok(matching.remove(0)),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|note| short_id(&note.id))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{normalized}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn short_id(id: &NoteId) -> String {
    id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .map(|note| {
            let short_id = short_id(&note.id);
            let preview = note_preview(note, 40);
            let relative_time = format_relative_time(note.updated_at.as_millis(), now_ms);
            format!("{short_id:<13}  {preview:<40}  {relative_time}")
        })
        .collect()
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();
    NoteListItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        body: note.body.clone(),
        preview: note_preview(note, 80),
        created_at: note.created_at.to_string(),
        updated_at: note.updated_at.to_string(),
        relative_time: format_relative_time(note.updated_at.as_millis(), now_ms),
    }
}

/// Title, or the first body line for untitled notes, collapsed to one line.
pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let source = if note.title.trim().is_empty() {
        note.body.as_deref().unwrap_or("")
    } else {
        note.title.as_str()
    };
    let first_line = source.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Title and body for a new note.
///
/// Title words on the command line win. Otherwise piped stdin or the editor
/// supplies the text, whose first line becomes the title.
pub fn resolve_new_note(
    title_parts: &[String],
    body: Option<String>,
) -> Result<(String, Option<String>), CliError> {
    if let Some(title) = normalize_content(&title_parts.join(" ")) {
        let body = match body {
            Some(body) => Some(body),
            None => read_piped_stdin()?,
        };
        return Ok((title, body));
    }

    let text = match read_piped_stdin()? {
        Some(text) => Some(text),
        None => capture_editor_input_with_initial("")?,
    };
    let Some(text) = text else {
        return Err(CliError::EmptyTitle);
    };

    let (title, parsed_body) = split_note_text(&text);
    if title.is_empty() {
        return Err(CliError::EmptyTitle);
    }
    Ok((title, body.or(parsed_body)))
}

/// Split editor text into a title line and an optional body.
pub fn split_note_text(text: &str) -> (String, Option<String>) {
    let text = text.trim();
    let (title, body) = text.split_once('\n').unwrap_or((text, ""));
    (title.trim().to_string(), normalize_content(body))
}

/// Inverse of [`split_note_text`], used to seed the editor.
pub fn join_note_text(title: &str, body: Option<&str>) -> String {
    match body.map(str::trim).filter(|body| !body.is_empty()) {
        Some(body) => format!("{title}\n\n{body}\n"),
        None => format!("{title}\n"),
    }
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(CliError::EditorFailed(format!(
            "`{editor}` exited with status {status}"
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // EDITOR may carry arguments, e.g. "code --wait"
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let status = Command::new(program).args(parts).arg(file_path).status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("jotter-note-{}-{now}.md", std::process::id()))
}
