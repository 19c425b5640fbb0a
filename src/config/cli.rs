use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererKind {
    /// Headless Chromium, runs the page's JavaScript
    Chrome,
    /// Plain HTTP GET, static HTML only
    Http,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the JSON file holding the contest URLs
    #[arg(long, env = "C4_URLS_FILE", default_value = "c4competitions.json")]
    pub urls_file: PathBuf,

    /// Spreadsheet that scraped rows are appended to
    #[arg(long, env = "C4_OUTPUT", default_value = "scraped_data.xlsx")]
    pub output: PathBuf,

    /// Worksheet name inside the output spreadsheet
    #[arg(long, default_value = "Sheet1")]
    pub sheet: String,

    /// How contest pages are rendered
    #[arg(long, value_enum, default_value_t = RendererKind::Chrome)]
    pub renderer: RendererKind,

    /// Launch a visible browser window instead of a headless one
    #[arg(long)]
    pub headful: bool,

    /// Seconds to wait for the page navigation to appear
    #[arg(long, default_value_t = 10)]
    pub ready_timeout_secs: u64,

    /// Seconds to wait for the Details tab to re-render
    #[arg(long, default_value_t = 3)]
    pub settle_timeout_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
