use super::{details_rendered, PageRenderer, DETAILS_TAB_XPATH, READY_SELECTOR};
use crate::error::{Result, ScrapeError};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(300);

/// One Chromium process with a single tab. Dropping it shuts the browser
/// down, whichever URL the run stopped on.
pub struct ChromeRenderer {
    tab: Arc<Tab>,
    _browser: Browser,
    ready_timeout: Duration,
    settle_timeout: Duration,
}

fn browser_error(e: impl ToString) -> ScrapeError {
    ScrapeError::Browser(e.to_string())
}

/// headless_chrome blocks, so every call goes through tokio's blocking pool.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ScrapeError::Other(format!("Browser task failed: {}", e)))?
}

impl ChromeRenderer {
    pub fn launch(headless: bool, ready_timeout: Duration, settle_timeout: Duration) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .build()
            .map_err(browser_error)?;

        let browser = Browser::new(options).map_err(browser_error)?;
        let tab = browser.new_tab().map_err(browser_error)?;
        info!("Launched Chromium (headless: {})", headless);

        Ok(Self {
            tab,
            _browser: browser,
            ready_timeout,
            settle_timeout,
        })
    }
}

impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        let tab = Arc::clone(&self.tab);
        let url = url.to_string();
        let ready_timeout = self.ready_timeout;

        blocking(move || {
            tab.navigate_to(&url)
                .map_err(|e| ScrapeError::navigation(&url, e))?;
            tab.wait_until_navigated()
                .map_err(|e| ScrapeError::navigation(&url, e))?;
            tab.wait_for_element_with_custom_timeout(READY_SELECTOR, ready_timeout)
                .map_err(|e| ScrapeError::navigation(&url, e))?;
            debug!("Rendered {}", url);
            tab.get_content().map_err(browser_error)
        })
        .await
    }

    async fn open_details(&self, url: &str, current: &str) -> Result<String> {
        let tab = Arc::clone(&self.tab);
        let url = url.to_string();
        let before = current.to_string();
        let ready_timeout = self.ready_timeout;
        let settle_timeout = self.settle_timeout;

        blocking(move || {
            tab.wait_for_xpath_with_custom_timeout(DETAILS_TAB_XPATH, ready_timeout)
                .map_err(browser_error)?
                .click()
                .map_err(browser_error)?;

            let deadline = Instant::now() + settle_timeout;
            loop {
                let content = tab.get_content().map_err(browser_error)?;
                if details_rendered(&before, &content) {
                    debug!("Details tab rendered for {}", url);
                    return Ok(content);
                }
                if Instant::now() >= deadline {
                    warn!(
                        "Details tab for {} not settled after {:?}, using current page",
                        url, settle_timeout
                    );
                    return Ok(content);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        })
        .await
    }
}
