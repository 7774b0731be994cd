//! One run: load credentials, then list or fetch.

use anyhow::{Context, Result};
use chrono::Local;
use dgc_backup::config::resolve_creds_path;
use dgc_backup::{
    BackupDownloader, CatalogClient, CompatMode, ConnectionConfig, FetchOutcome, HttpClient,
    HttpTimeouts, RunOptions, fetch_backup,
};
use tracing::info;

use crate::cli::Args;

pub(crate) async fn run(args: &Args) -> Result<()> {
    let creds_path = resolve_creds_path(args.creds.as_deref())?;
    info!(path = %creds_path.display(), "loading credentials");
    let mut config = ConnectionConfig::load(&creds_path)?;
    if let Some(output_dir) = &args.output_dir {
        config = config.with_backup_dir(output_dir);
    }

    let http = HttpClient::with_timeouts(HttpTimeouts::from_config(&config))
        .context("failed to build HTTP client")?;
    let compat = if args.legacy {
        CompatMode::Legacy
    } else {
        CompatMode::Strict
    };
    let catalog = CatalogClient::new(http.clone(), compat);

    if args.list {
        return list_catalog(&catalog, &config).await;
    }

    let downloader = BackupDownloader::new(http, compat);
    let options = RunOptions {
        today: args.date.unwrap_or_else(|| Local::now().date_naive()),
        date_offset_days: args.days_back,
        compat,
        dry_run: args.dry_run,
    };

    let outcome = fetch_backup(&catalog, &downloader, &config, &options).await?;
    print_outcome(&outcome, &config);
    Ok(())
}

async fn list_catalog(catalog: &CatalogClient, config: &ConnectionConfig) -> Result<()> {
    let records = catalog.list_backups(config).await?;
    for record in &records {
        let size = or_dash(record.size);
        let created = or_dash(record.created_date);
        println!("{}\t{}\t{size}\t{created}", record.id, record.name());
    }
    Ok(())
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

fn print_outcome(outcome: &FetchOutcome, config: &ConnectionConfig) {
    match &outcome.download {
        Some(download) => println!(
            "{}\t{} bytes",
            download.path.display(),
            download.bytes_written
        ),
        None => println!(
            "{}\t(dry run, backup date {})",
            config.archive_path(outcome.selected.name()).display(),
            outcome.backup_date
        ),
    }
}
