//! Backup archive download.
//!
//! This module streams a selected backup's archive from
//! `POST {base}/rest/backup/file/{id}` to `{backup-dir}/{name}.zip`.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large archives)
//! - Exact byte accounting, reported and returned
//! - Destination handle flushed and released on every exit path
//! - Partial archives removed after a failed transfer
//!
//! # Example
//!
//! ```no_run
//! use dgc_backup::{BackupDownloader, BackupRecord, CompatMode, ConnectionConfig, HttpClient, SelectedBackup};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectionConfig::load(Path::new("creds.json"))?;
//! let downloader = BackupDownloader::new(HttpClient::new()?, CompatMode::Strict);
//! let selected = SelectedBackup::Found(BackupRecord::new("0c7f-41aa", "daily-2024-03-05-backup"));
//! let outcome = downloader.download(&selected, &config).await?;
//! println!("{} ({} bytes)", outcome.path.display(), outcome.bytes_written);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{BackupDownloader, DownloadOutcome};
pub use error::DownloadError;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
