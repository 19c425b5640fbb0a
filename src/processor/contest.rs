use crate::domain::{Record, NSLOC_COLUMN, NSLOC_MISSING};
use crate::error::Result;
use crate::infrastructure::PageRenderer;
use crate::scrapers::{headline, leaderboard, totals};
use scraper::Html;
use tracing::{info, warn};

/// Runs the four scraping steps for one contest page.
pub struct ContestProcessor<'a, R> {
    renderer: &'a R,
}

impl<'a, R: PageRenderer> ContestProcessor<'a, R> {
    pub fn new(renderer: &'a R) -> Self {
        Self { renderer }
    }

    pub async fn process(&self, url: &str) -> Result<Record> {
        // Step 1: Render the page
        info!("Step 1: Rendering {}", url);
        let html = self.renderer.render(url).await?;

        // Step 2: Seed the record from the headlines
        let (mut record, has_leaderboard) = {
            let document = Html::parse_document(&html);
            (
                headline::seed_record(&document, url)?,
                leaderboard::has_leaderboard(&document),
            )
        };

        // Step 3: Sum the leaderboard from the Details tab
        let html = if has_leaderboard {
            info!("Step 3: Leaderboard found, switching to Details");
            let details = self.renderer.open_details(url, &html).await?;

            match leaderboard::sum_columns(&Html::parse_document(&details)) {
                Some(sums) if sums.is_empty() => {
                    warn!("Leaderboard on {} has no numeric columns", url)
                }
                Some(sums) => {
                    for (column, sum) in sums.iter() {
                        info!("Sum {}: {}", column, sum);
                    }
                    record.merge_sums(&sums);
                }
                None => warn!("Leaderboard missing from the Details view of {}", url),
            }
            details
        } else {
            info!("Step 3: No leaderboard on {}", url);
            html
        };

        // Step 4: Pick nSloc out of the scope tables
        if let Some(nsloc) = totals::extract_nsloc(&Html::parse_document(&html)) {
            if nsloc == NSLOC_MISSING {
                warn!("Not enough data in the totals row of {}", url);
            }
            info!("Step 4: nSloc {}", nsloc);
            record.set(NSLOC_COLUMN, nsloc);
        }

        if record.is_empty() {
            warn!("Nothing scraped from {}", url);
        }
        Ok(record)
    }
}
