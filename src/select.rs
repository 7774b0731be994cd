//! Backup selection by expected name.
//!
//! The expected name is the configured `backup-format` with the first
//! `<DATE>` replaced by a `YYYY-MM-DD` date. The date is today shifted back by
//! `date-offset-days`; the default offset of 0 selects today's backup.

use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use crate::backup::{BackupRecord, SelectedBackup};
use crate::config::{ConnectionConfig, DATE_PLACEHOLDER};

/// Formats a date as `YYYY-MM-DD`, zero padded.
#[must_use]
pub fn format_backup_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns `today` shifted back by `offset_days`.
///
/// Saturates at the earliest representable date.
#[must_use]
pub fn target_date(today: NaiveDate, offset_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(offset_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Substitutes the first `<DATE>` in `format` with `date`.
///
/// Additional placeholders are left intact; a template without a placeholder
/// is returned unchanged.
#[must_use]
pub fn expected_backup_name(format: &str, date: NaiveDate) -> String {
    format.replacen(DATE_PLACEHOLDER, &format_backup_date(date), 1)
}

/// Picks the first record, in catalog order, whose name equals the expected
/// name for `date`.
///
/// Matching is exact and case-sensitive. No match yields
/// [`SelectedBackup::NotFound`].
#[must_use]
pub fn select_backup(
    records: &[BackupRecord],
    config: &ConnectionConfig,
    date: NaiveDate,
) -> SelectedBackup {
    let expected_name = expected_backup_name(&config.backup_format, date);
    info!(expected = %expected_name, "finding backup by name");

    match records.iter().find(|record| record.name() == expected_name) {
        Some(record) => {
            debug!(id = %record.id, name = %record.name(), "backup matched");
            SelectedBackup::Found(record.clone())
        }
        None => {
            debug!(candidates = records.len(), "no backup matched");
            SelectedBackup::NotFound { expected_name }
        }
    }
}
