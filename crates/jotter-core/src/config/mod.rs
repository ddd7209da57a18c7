//! Persistent client configuration.
//!
//! `JotterConfig` is a small JSON document. Every field has a default, so a
//! missing or partial file still loads. Environment variables override the
//! file for the cache location and the remote store.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_PAGE_SIZE;
use crate::error::{Error, Result};
use crate::network::{FileNoteNetwork, HttpNoteNetwork, NoteNetworkDataSource};
use crate::services::{CallTimeouts, CACHE_TIMEOUT, NETWORK_TIMEOUT};
use crate::sync::TieBreak;

const CONFIG_SCHEMA_VERSION: u32 = 1;

pub const ENV_DB_PATH: &str = "JOTTER_DB_PATH";
pub const ENV_REMOTE: &str = "JOTTER_REMOTE";
pub const ENV_REMOTE_TOKEN: &str = "JOTTER_REMOTE_TOKEN";

/// Keys accepted by [`JotterConfig::set`] and [`JotterConfig::get`].
pub const CONFIG_KEYS: [&str; 7] = [
    "db_path",
    "remote",
    "remote_token",
    "page_size",
    "cache_timeout_ms",
    "network_timeout_ms",
    "tie_break",
];

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct JotterConfig {
    pub version: u32,
    /// Cache database file; the client picks a platform default when unset.
    pub db_path: Option<PathBuf>,
    /// `http(s)://` base URL or a path to a shared JSON document file.
    pub remote: Option<String>,
    pub remote_token: Option<String>,
    pub page_size: u32,
    pub cache_timeout_ms: u64,
    pub network_timeout_ms: u64,
    pub tie_break: TieBreak,
}

impl Default for JotterConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_SCHEMA_VERSION,
            db_path: None,
            remote: None,
            remote_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            cache_timeout_ms: duration_millis(CACHE_TIMEOUT),
            network_timeout_ms: duration_millis(NETWORK_TIMEOUT),
            tie_break: TieBreak::default(),
        }
    }
}

impl std::fmt::Debug for JotterConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("JotterConfig")
            .field("version", &self.version)
            .field("db_path", &self.db_path)
            .field("remote", &self.remote)
            .field(
                "remote_token",
                &self.remote_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("page_size", &self.page_size)
            .field("cache_timeout_ms", &self.cache_timeout_ms)
            .field("network_timeout_ms", &self.network_timeout_ms)
            .field("tie_break", &self.tie_break)
            .finish()
    }
}

/// Where the remote document store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    Http {
        base_url: String,
        token: Option<String>,
    },
    File(PathBuf),
}

impl RemoteTarget {
    pub fn connect(&self) -> Result<Arc<dyn NoteNetworkDataSource>> {
        match self {
            Self::Http { base_url, token } => {
                Ok(Arc::new(HttpNoteNetwork::new(base_url.clone(), token.clone())?))
            }
            Self::File(path) => Ok(Arc::new(FileNoteNetwork::new(path.clone()))),
        }
    }
}

impl std::fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { base_url, .. } => f.write_str(base_url),
            Self::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

impl JotterConfig {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!(
                "Failed to read config at {}: {error}",
                path.display()
            ))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!(
                    "Failed to create config directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized).map_err(|error| {
            Error::Config(format!(
                "Failed to write config at {}: {error}",
                path.display()
            ))
        })
    }

    /// Apply `JOTTER_*` overrides read through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DB_PATH).as_deref().and_then(non_blank) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(remote) = lookup(ENV_REMOTE).as_deref().and_then(non_blank) {
            self.remote = Some(remote);
        }
        if let Some(token) = lookup(ENV_REMOTE_TOKEN).as_deref().and_then(non_blank) {
            self.remote_token = Some(token);
        }
    }

    pub fn timeouts(&self) -> CallTimeouts {
        CallTimeouts {
            cache: Duration::from_millis(self.cache_timeout_ms),
            network: Duration::from_millis(self.network_timeout_ms),
        }
    }

    /// The configured remote, if any.
    pub fn remote_target(&self) -> Option<RemoteTarget> {
        let remote = self.remote.as_deref().and_then(non_blank)?;
        if is_http_url(&remote) {
            return Some(RemoteTarget::Http {
                base_url: remote,
                token: self.remote_token.as_deref().and_then(non_blank),
            });
        }
        let path = remote.strip_prefix("file://").unwrap_or(&remote);
        Some(RemoteTarget::File(PathBuf::from(path)))
    }

    /// Update one setting from its string form. An empty value resets it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let defaults = Self::default();
        match key {
            "db_path" => {
                self.db_path = non_blank(value).map(PathBuf::from);
            }
            "remote" => self.remote = non_blank(value),
            "remote_token" => self.remote_token = non_blank(value),
            "page_size" => {
                self.page_size = parse_or_default(key, value, defaults.page_size)?;
            }
            "cache_timeout_ms" => {
                self.cache_timeout_ms = parse_or_default(key, value, defaults.cache_timeout_ms)?;
            }
            "network_timeout_ms" => {
                self.network_timeout_ms =
                    parse_or_default(key, value, defaults.network_timeout_ms)?;
            }
            "tie_break" => {
                self.tie_break = if value.is_empty() {
                    defaults.tie_break
                } else {
                    value.parse()?
                };
            }
            other => return Err(unknown_key(other)),
        }
        self.normalize();
        Ok(())
    }

    /// Read one setting in its string form. Tokens are never echoed.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(match key {
            "db_path" => self.db_path.as_ref().map(|p| p.display().to_string()),
            "remote" => self.remote.clone(),
            "remote_token" => self.remote_token.as_ref().map(|_| "[REDACTED]".to_string()),
            "page_size" => Some(self.page_size.to_string()),
            "cache_timeout_ms" => Some(self.cache_timeout_ms.to_string()),
            "network_timeout_ms" => Some(self.network_timeout_ms.to_string()),
            "tie_break" => Some(self.tie_break.to_string()),
            other => return Err(unknown_key(other)),
        })
    }

    fn normalize(&mut self) {
        let defaults = Self::default();
        self.remote = self.remote.as_deref().and_then(non_blank);
        self.remote_token = self.remote_token.as_deref().and_then(non_blank);
        if self.page_size == 0 {
            self.page_size = defaults.page_size;
        }
        if self.cache_timeout_ms == 0 {
            self.cache_timeout_ms = defaults.cache_timeout_ms;
        }
        if self.network_timeout_ms == 0 {
            self.network_timeout_ms = defaults.network_timeout_ms;
        }
    }
}

/// Trimmed text, or `None` when only whitespace remains.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub(crate) fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_or_default<T: std::str::FromStr>(key: &str, value: &str, default: T) -> Result<T> {
    if value.is_empty() {
        return Ok(default);
    }
    value
        .parse()
        .map_err(|_| Error::InvalidInput(format!("'{value}' is not a valid value for {key}")))
}

fn unknown_key(key: &str) -> Error {
    Error::InvalidInput(format!(
        "unknown config key '{key}' (expected one of: {})",
        CONFIG_KEYS.join(", ")
    ))
}
