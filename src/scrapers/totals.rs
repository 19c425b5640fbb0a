use super::element_text;
use crate::domain::NSLOC_MISSING;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse("div.table-container").unwrap());
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

const TOTALS: &str = "Totals";
const TOTAL: &str = "TOTAL";

/// Picks the nSloc cell out of a totals row. "Totals" rows carry it in the
/// 4th cell, "TOTAL" rows in the 2nd.
pub fn nsloc_from_cells(cells: &[String]) -> String {
    let has = |label: &str| cells.iter().any(|c| c == label);

    if has(TOTALS) && cells.len() >= 4 {
        cells[3].clone()
    } else if has(TOTAL) && cells.len() >= 2 {
        cells[1].clone()
    } else {
        NSLOC_MISSING.to_string()
    }
}

/// nSloc from the first totals row on the page, `None` if there is none.
pub fn extract_nsloc(document: &Html) -> Option<String> {
    document
        .select(&CONTAINER)
        .filter_map(|container| container.select(&TABLE).next())
        .flat_map(|table| table.select(&ROW))
        .map(|row| row.select(&CELL).map(element_text).collect::<Vec<_>>())
        .find(|cells| cells.iter().any(|c| c == TOTALS || c == TOTAL))
        .map(|cells| nsloc_from_cells(&cells))
}
