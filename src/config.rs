//! Credential file loading.
//!
//! The credential file is a JSON document holding the platform base URL, the
//! account used for Basic authentication, the archive encryption key and the
//! local naming rules for downloaded archives:
//!
//! ```json
//! {
//!   "dgc": "https://dgc.example.com",
//!   "username": "backup-bot",
//!   "password": "secret",
//!   "encryption-key": "archive-key",
//!   "backup-dir": "/var/backups/dgc",
//!   "backup-format": "daily-<DATE>-backup"
//! }
//! ```
//!
//! The loaded [`ConnectionConfig`] is built once at the entry point and passed
//! by reference to every component.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Placeholder in `backup-format` replaced by the backup date.
pub const DATE_PLACEHOLDER: &str = "<DATE>";

/// Credential file name under `$HOME/.creds/`.
pub const DEFAULT_CREDS_FILE: &str = "dhc_collibra.json";

/// Environment variable overriding the credential file location.
pub const CREDS_PATH_ENV: &str = "DGC_BACKUP_CREDS";

/// Errors that can occur while loading the credential file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `$HOME` nor an explicit path is available.
    #[error("cannot locate credential file: HOME is not set and no path was given")]
    HomeDirUnavailable,

    /// The credential file could not be read.
    #[error("failed to read credential file {path}: {source}")]
    Read {
        /// The credential file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The credential file is not valid JSON of the expected shape.
    #[error("failed to parse credential file {path}: {source}")]
    Parse {
        /// The credential file path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A required field is present but empty.
    #[error("credential field `{field}` must not be empty")]
    MissingField {
        /// The JSON key of the empty field.
        field: &'static str,
    },

    /// The `dgc` base URL is not an absolute http(s) URL.
    #[error("invalid platform URL `{url}`: expected an absolute http(s) URL")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
    },
}

/// How closely a run follows the original tool's behaviour.
///
/// Two independent policies read this value. [`crate::CatalogClient`] and
/// [`crate::BackupDownloader`] use their own copy for response status
/// handling; [`crate::RunOptions::compat`] decides what happens when nothing
/// matches. The binary sets all three from `--legacy`; library callers may
/// combine them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompatMode {
    /// Reject non-2xx responses and stop before downloading when no backup
    /// matches the expected name.
    #[default]
    Strict,
    /// Ignore response status codes and attempt the download with an empty
    /// identifier when nothing matches.
    Legacy,
}

/// Connection parameters for one run, loaded from the credential file.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectionConfig {
    /// Platform base URL (`dgc`).
    #[serde(rename = "dgc")]
    pub base_url: String,
    /// Basic-auth user name.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Shared secret sent as the `key` form field when downloading.
    pub encryption_key: String,
    /// Directory that receives `{name}.zip`.
    pub backup_dir: PathBuf,
    /// Backup name template containing [`DATE_PLACEHOLDER`].
    pub backup_format: String,
    /// Days subtracted from today before formatting the date (0 = today).
    #[serde(default)]
    pub date_offset_days: u32,
    /// Optional connect timeout in seconds (0 disables).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Optional per-read timeout in seconds (0 disables).
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("encryption_key", &"<redacted>")
            .field("backup_dir", &self.backup_dir)
            .field("backup_format", &self.backup_format)
            .field("date_offset_days", &self.date_offset_days)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .finish()
    }
}

impl ConnectionConfig {
    /// Loads and validates the credential file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is not valid JSON
    /// of the expected shape, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading credential file");
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_config_str(&raw, path)
    }

    /// Parses a credential document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or a validation error.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        parse_config_str(raw, Path::new("<inline>"))
    }

    /// Checks required fields and the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for empty required fields and
    /// [`ConfigError::InvalidBaseUrl`] for a non-http(s) base URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, bool); 5] = [
            ("dgc", self.base_url.trim().is_empty()),
            ("username", self.username.is_empty()),
            ("backup-dir", self.backup_dir.as_os_str().is_empty()),
            ("backup-format", self.backup_format.is_empty()),
            ("encryption-key", self.encryption_key.is_empty()),
        ];
        if let Some((field, _)) = required.into_iter().find(|(_, empty)| *empty) {
            return Err(ConfigError::MissingField { field });
        }

        match Url::parse(self.base_url.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            _ => Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
            }),
        }
    }

    /// Replaces the destination directory, e.g. from `--output-dir`.
    #[must_use]
    pub fn with_backup_dir(mut self, backup_dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = backup_dir.into();
        self
    }

    /// `{base}/rest/backup`
    #[must_use]
    pub fn backups_url(&self) -> String {
        format!("{}/rest/backup", self.base())
    }

    /// `{base}/rest/backup/file/{id}`
    #[must_use]
    pub fn backup_file_url(&self, id: &str) -> String {
        format!("{}/rest/backup/file/{id}", self.base())
    }

    /// `{backup_dir}/{name}.zip`
    #[must_use]
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.backup_dir.join(format!("{name}.zip"))
    }

    fn base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

fn parse_config_str(raw: &str, origin: &Path) -> Result<ConnectionConfig, ConfigError> {
    let config: ConnectionConfig =
        serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Resolves the credential file path.
///
/// Priority:
/// 1. `explicit` (the `--creds` flag)
/// 2. `$DGC_BACKUP_CREDS`
/// 3. `$HOME/.creds/dhc_collibra.json`
///
/// # Errors
///
/// Returns [`ConfigError::HomeDirUnavailable`] when no source yields a path.
pub fn resolve_creds_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env_var_non_empty_os(CREDS_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    let home = env_var_non_empty_os("HOME").ok_or(ConfigError::HomeDirUnavailable)?;
    Ok(PathBuf::from(home).join(".creds").join(DEFAULT_CREDS_FILE))
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}
