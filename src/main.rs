use crate::config::cli::Args;
use crate::config::{parse_log_level, Config};
use crate::error::Result;
use clap::Parser;
use tracing::info;

mod config;
mod domain;
mod error;
mod infrastructure;
mod processor;
mod scrapers;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level)?)
        .init();

    let config = Config::new(args)?;
    let summary = processor::run(&config).await?;

    info!(
        "Scraping completed: {} rows appended, {} URLs skipped",
        summary.appended, summary.skipped
    );
    Ok(())
}
