use super::element_text;
use crate::domain::ColumnSums;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Leaderboard columns before this index hold rank, handle and team.
pub const FIRST_VALUE_COLUMN: usize = 3;

static WRAPPER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".leaderboard-table-reduced__wrapper").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"ul[role="row"]"#).unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());

fn find_leaderboard(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&WRAPPER).next()
}

pub fn has_leaderboard(document: &Html) -> bool {
    find_leaderboard(document).is_some()
}

/// Header cell texts of the leaderboard, empty without a leaderboard.
pub fn header_titles(document: &Html) -> Vec<String> {
    find_leaderboard(document)
        .and_then(|leaderboard| leaderboard.select(&ROW).next())
        .map(|header| header.select(&CELL).map(element_text).collect())
        .unwrap_or_default()
}

/// Strips thousands separators and dollar signs. Anything that still isn't a
/// number is skipped by the caller.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.replace([',', '$'], "").parse::<f64>().ok()
}

/// Sums every value column across the participant rows, keyed by header text.
/// Returns `None` when the page has no leaderboard.
pub fn sum_columns(document: &Html) -> Option<ColumnSums> {
    let leaderboard = find_leaderboard(document)?;
    let mut rows = leaderboard.select(&ROW);
    let mut sums = ColumnSums::default();

    let Some(header) = rows.next() else {
        return Some(sums);
    };
    let titles: Vec<String> = header.select(&CELL).map(element_text).collect();

    for row in rows {
        let cells = row.select(&CELL).map(element_text);
        for (title, text) in titles.iter().zip(cells).skip(FIRST_VALUE_COLUMN) {
            if let Some(value) = parse_amount(&text) {
                sums.add(title, value);
            }
        }
    }

    Some(sums)
}
