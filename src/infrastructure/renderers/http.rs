use super::{has_ready_marker, PageRenderer};
use crate::error::{Result, ScrapeError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Fetches pages without running their JavaScript. Only useful for pages
/// that are served pre-rendered.
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self { client })
    }
}

impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if !has_ready_marker(&html) {
            return Err(ScrapeError::navigation(url, "page has no secondary navigation"));
        }
        Ok(html)
    }

    async fn open_details(&self, url: &str, current: &str) -> Result<String> {
        debug!("Static page {} has no Details tab to switch to", url);
        Ok(current.to_string())
    }
}
