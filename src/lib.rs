//! DGC Backup Library
//!
//! This library fetches one dated backup archive from a data-governance
//! platform's REST backup API: it lists the available backups, picks the one
//! whose name matches a date-stamped template and streams its archive to disk.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Credential file loading (`ConnectionConfig`)
//! - [`http`] - Shared HTTP client policy (timeouts, user agent, Basic auth)
//! - [`backup`] - Backup records as returned by the catalog
//! - [`catalog`] - Listing backups over `GET /rest/backup`
//! - [`select`] - Expected-name computation and record selection
//! - [`download`] - Streaming the archive over `POST /rest/backup/file/{id}`
//! - [`workflow`] - The list, select, download sequence

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backup;
pub mod catalog;
pub mod config;
pub mod download;
pub mod http;
pub mod select;
pub mod workflow;

mod user_agent;

// Re-export commonly used types
pub use backup::{BackupInformation, BackupRecord, SelectedBackup};
pub use catalog::{CatalogClient, CatalogError};
pub use config::{CompatMode, ConfigError, ConnectionConfig, DATE_PLACEHOLDER};
pub use download::{BackupDownloader, DownloadError, DownloadOutcome};
pub use http::{HttpClient, HttpTimeouts};
pub use select::{expected_backup_name, format_backup_date, select_backup, target_date};
pub use workflow::{FetchError, FetchOutcome, RunOptions, fetch_backup};
