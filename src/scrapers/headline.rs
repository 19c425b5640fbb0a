use super::element_text;
use crate::domain::{Headline, Record};
use crate::error::{Result, ScrapeError};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{info, warn};

pub const GROUP_SIZE: usize = 5;

static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse(".type__headline__xs").unwrap());

pub fn extract_headlines(document: &Html) -> Result<Vec<Headline>> {
    let texts: Vec<String> = document.select(&HEADLINE).map(element_text).collect();

    texts
        .chunks(GROUP_SIZE)
        .map(|group| match group {
            [name, start_date, end_date, prize_pool, duration] => Ok(Headline {
                name: name.clone(),
                start_date: start_date.clone(),
                end_date: end_date.clone(),
                prize_pool: prize_pool.clone(),
                duration: duration.clone(),
            }),
            partial => Err(ScrapeError::Headline(format!(
                "found {} headline fragments, last group has {} of {}",
                texts.len(),
                partial.len(),
                GROUP_SIZE
            ))),
        })
        .collect()
}

/// Builds the record from the page headlines. Every group replaces the record
/// built from the previous one, so a page with several headline blocks keeps
/// only the last.
pub fn seed_record(document: &Html, url: &str) -> Result<Record> {
    let headlines = extract_headlines(document)?;
    if headlines.is_empty() {
        warn!("No headlines found on {}", url);
        return Ok(Record::new());
    }

    let mut record = Record::new();
    for headline in &headlines {
        info!(
            name = %headline.name,
            start_date = %headline.start_date,
            end_date = %headline.end_date,
            prize_pool = %headline.prize_pool,
            duration = %headline.duration,
            "Headline"
        );
        record = Record::from_headline(headline, url);
    }

    Ok(record)
}
