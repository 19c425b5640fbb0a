use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("Browser error: {0}")]
    Browser(String),
    #[error("Headline error: {0}")]
    Headline(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::XlsxError),
    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error("{0}")]
    Other(String),
}

impl ScrapeError {
    pub fn navigation(url: &str, reason: impl ToString) -> Self {
        ScrapeError::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Failures that only affect the current URL. Everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Network(_) | ScrapeError::Navigation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
