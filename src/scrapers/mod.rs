use scraper::ElementRef;

pub(crate) mod headline;
pub(crate) mod leaderboard;
pub(crate) mod totals;

/// Text content with every text node trimmed and the pieces joined without
/// separators, so `<li> $1,000 <span>.50</span></li>` reads as `$1,000.50`.
pub fn element_text(element: ElementRef) -> String {
    element.text().map(str::trim).collect()
}
