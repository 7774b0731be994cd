//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Fetch the dated backup archive from a DGC backup REST API.
///
/// Lists the platform's backups, picks the one named after the configured
/// `backup-format` for the target date and streams it to `{backup-dir}/{name}.zip`.
#[derive(Parser, Debug)]
#[command(name = "dgc-backup")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,

    /// Credential file (default: $DGC_BACKUP_CREDS, then ~/.creds/dhc_collibra.json)
    #[arg(long, value_name = "PATH")]
    pub creds: Option<PathBuf>,

    /// Directory for the archive, overriding `backup-dir`
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Reference date instead of today
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Days to subtract from the reference date (1 = yesterday), overriding `date-offset-days`
    #[arg(long, value_name = "DAYS")]
    pub days_back: Option<u32>,

    /// Reproduce the original tool: ignore HTTP status codes and download even when no backup matches
    #[arg(long)]
    pub legacy: bool,

    /// Select the backup and report the destination without downloading
    #[arg(long)]
    pub dry_run: bool,

    /// List the available backups and exit
    #[arg(long, conflicts_with = "dry_run")]
    pub list: bool,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got `{raw}`: {e}"))
}
