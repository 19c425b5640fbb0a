use crate::error::Result;
use crate::scrapers::leaderboard;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

pub(crate) mod chrome;
pub(crate) mod http;

/// Present once the contest page has finished client-side rendering.
pub const READY_SELECTOR: &str = ".secondary-nav__item";
pub const DETAILS_TAB_XPATH: &str = "//li[contains(text(),'Details')]";

static READY: Lazy<Selector> = Lazy::new(|| Selector::parse(READY_SELECTOR).unwrap());

/// A browser-like session that is reused for every contest page. Calls are
/// made one at a time and each one may change what the session shows.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    /// Loads `url` and returns the rendered HTML once the page is ready.
    async fn render(&self, url: &str) -> Result<String>;

    /// Switches the currently loaded page to its Details tab and returns the
    /// re-rendered HTML. `current` is the HTML returned by the last `render`.
    async fn open_details(&self, url: &str, current: &str) -> Result<String>;
}

pub fn has_ready_marker(html: &str) -> bool {
    Html::parse_document(html).select(&READY).next().is_some()
}

/// The Details view has replaced the reduced leaderboard once the header row
/// differs from the one shown before the click and carries value columns.
pub fn details_rendered(before: &str, after: &str) -> bool {
    let old_header = leaderboard::header_titles(&Html::parse_document(before));
    let new_header = leaderboard::header_titles(&Html::parse_document(after));
    new_header != old_header && new_header.len() > leaderboard::FIRST_VALUE_COLUMN
}
