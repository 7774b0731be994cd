//! CLI entry point for the dgc-backup tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app;
mod cli;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let default_level = app::terminal::default_log_level(args.verbose, args.quiet);
    let no_color = app::terminal::is_no_color_requested(args.no_color);
    app::terminal::init_tracing(default_level, no_color);

    debug!(?args, "CLI arguments parsed");

    app::runtime::run(&args).await
}
