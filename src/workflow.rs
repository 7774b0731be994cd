//! The list, select, download sequence for one run.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::backup::SelectedBackup;
use crate::catalog::{CatalogClient, CatalogError};
use crate::config::{CompatMode, ConnectionConfig};
use crate::download::{BackupDownloader, DownloadError, DownloadOutcome};
use crate::select::{select_backup, target_date};

/// Errors that end a fetch run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Listing the catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Downloading the archive failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// No catalog entry carries the expected name (strict mode only).
    #[error("no backup named `{expected_name}` in the catalog ({available} available)")]
    NoMatchingBackup {
        /// The name that was searched for.
        expected_name: String,
        /// Number of catalog entries searched.
        available: usize,
    },
}

/// Per-run switches that are not part of the credential file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Reference date; the backup date is this minus `date_offset_days`.
    pub today: NaiveDate,
    /// Overrides the credential file's `date-offset-days` when set.
    pub date_offset_days: Option<u32>,
    /// No-match policy: strict stops before downloading, legacy proceeds with
    /// the empty identifier. Status handling is set on the clients instead.
    pub compat: CompatMode,
    /// Select and report without downloading.
    pub dry_run: bool,
}

impl RunOptions {
    /// Options for a strict, downloading run on `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            date_offset_days: None,
            compat: CompatMode::Strict,
            dry_run: false,
        }
    }
}

/// What a run selected and, unless dry-run, what it wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// The selection made from the catalog.
    pub selected: SelectedBackup,
    /// The backup date the expected name was built from.
    pub backup_date: NaiveDate,
    /// The written archive; `None` on dry-run.
    pub download: Option<DownloadOutcome>,
}

/// Lists the catalog, selects the backup for the target date and downloads it.
///
/// # Errors
///
/// Returns [`FetchError`] when listing or downloading fails, or when nothing
/// matches in [`CompatMode::Strict`].
pub async fn fetch_backup(
    catalog: &CatalogClient,
    downloader: &BackupDownloader,
    config: &ConnectionConfig,
    options: &RunOptions,
) -> Result<FetchOutcome, FetchError> {
    let records = catalog.list_backups(config).await?;

    let offset = options.date_offset_days.unwrap_or(config.date_offset_days);
    let backup_date = target_date(options.today, offset);
    let selected = select_backup(&records, config, backup_date);

    if let SelectedBackup::NotFound { expected_name } = &selected {
        match options.compat {
            CompatMode::Strict => {
                return Err(FetchError::NoMatchingBackup {
                    expected_name: expected_name.clone(),
                    available: records.len(),
                });
            }
            CompatMode::Legacy => {
                warn!(expected = %expected_name, "no matching backup; downloading with empty id");
            }
        }
    }

    if options.dry_run {
        info!(
            id = %selected.id(),
            path = %config.archive_path(selected.name()).display(),
            "dry run: skipping download"
        );
        return Ok(FetchOutcome {
            selected,
            backup_date,
            download: None,
        });
    }

    let download = downloader.download(&selected, config).await?;
    Ok(FetchOutcome {
        selected,
        backup_date,
        download: Some(download),
    })
}
