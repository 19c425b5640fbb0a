mod contest;

use self::contest::ContestProcessor;

use crate::config::cli::RendererKind;
use crate::config::Config;
use crate::domain::RecordSink;
use crate::error::{Result, ScrapeError};
use crate::infrastructure::{ChromeRenderer, HttpRenderer, PageRenderer, XlsxStore};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub appended: usize,
    pub skipped: usize,
}

pub struct Processor<R, S> {
    renderer: R,
    sink: S,
}

impl<R: PageRenderer, S: RecordSink> Processor<R, S> {
    pub fn new(renderer: R, sink: S) -> Self {
        Self { renderer, sink }
    }

    /// Scrapes every URL in order and appends one row per page. Fetch
    /// failures skip the URL; any other error stops the run.
    pub async fn run(&mut self, urls: &[String]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| ScrapeError::Other(e.to_string()))?,
        );

        for url in urls {
            pb.set_message(url.clone());

            match ContestProcessor::new(&self.renderer).process(url).await {
                Ok(record) => {
                    self.sink.append(&record)?;
                    summary.appended += 1;
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping {}: {}", url, e);
                    summary.skipped += 1;
                }
                Err(e) => {
                    pb.abandon_with_message(format!("Stopped at {}", url));
                    return Err(e);
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message("Done scraping contests!");
        Ok(summary)
    }

    #[cfg(test)]
    fn into_parts(self) -> (R, S) {
        (self.renderer, self.sink)
    }
}

/// Builds the renderer and spreadsheet named in the config and runs them over
/// the URL list. The renderer is dropped, and with it the browser, on return.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let args = &config.args;
    let store = XlsxStore::new(&args.output, &args.sheet);
    info!("Appending to {:?} ({})", store.path(), args.sheet);

    match args.renderer {
        RendererKind::Chrome => {
            let renderer = ChromeRenderer::launch(
                !args.headful,
                config.ready_timeout(),
                config.settle_timeout(),
            )?;
            Processor::new(renderer, store)
                .run(&config.url_list.urls)
                .await
        }
        RendererKind::Http => {
            let renderer = HttpRenderer::new(config.ready_timeout())?;
            Processor::new(renderer, store)
                .run(&config.url_list.urls)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, Record};
    use std::cell::RefCell;
    use std::collections::HashMap;

    enum FakePage {
        Ready { first: String, details: String },
        Unreachable,
    }

    #[derive(Default)]
    struct FakeRenderer {
        pages: HashMap<String, FakePage>,
        rendered: RefCell<Vec<String>>,
        details_opened: RefCell<usize>,
    }

    impl FakeRenderer {
        fn page(mut self, url: &str, first: String, details: String) -> Self {
            self.pages
                .insert(url.to_string(), FakePage::Ready { first, details });
            self
        }

        fn unreachable(mut self, url: &str) -> Self {
            self.pages.insert(url.to_string(), FakePage::Unreachable);
            self
        }
    }

    impl PageRenderer for FakeRenderer {
        async fn render(&self, url: &str) -> Result<String> {
            self.rendered.borrow_mut().push(url.to_string());
            match self.pages.get(url) {
                Some(FakePage::Ready { first, .. }) => Ok(first.clone()),
                Some(FakePage::Unreachable) | None => {
                    // Unparseable URL: a real reqwest error with no network access
                    let err = reqwest::Client::new().get("http://").send().await.unwrap_err();
                    Err(err.into())
                }
            }
        }

        async fn open_details(&self, url: &str, _current: &str) -> Result<String> {
            *self.details_opened.borrow_mut() += 1;
            match self.pages.get(url) {
                Some(FakePage::Ready { details, .. }) => Ok(details.clone()),
                _ => Err(ScrapeError::Browser("no Details tab".into())),
            }
        }
    }

    #[derive(Default)]
    struct MemorySink {
        rows: Vec<Record>,
    }

    impl RecordSink for MemorySink {
        fn append(&mut self, record: &Record) -> Result<()> {
            self.rows.push(record.clone());
            Ok(())
        }
    }

    fn headlines(fragments: &[&str]) -> String {
        fragments
            .iter()
            .map(|t| format!(r#"<h3 class="type__headline__xs">{}</h3>"#, t))
            .collect()
    }

    fn leaderboard(rows: &[&[&str]]) -> String {
        let rows: String = rows
            .iter()
            .map(|cells| {
                let items: String = cells.iter().map(|c| format!("<li>{}</li>", c)).collect();
                format!(r#"<ul role="row">{}</ul>"#, items)
            })
            .collect();
        format!(
            r#"<div class="leaderboard-table-reduced__wrapper">{}</div>"#,
            rows
        )
    }

    fn scope_table(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
        format!(
            r#"<div class="table-container"><table><tr><td>src/Vault.sol</td><td>1</td><td></td><td>80</td></tr><tr>{}</tr></table></div>"#,
            tds
        )
    }

    fn page(body: &[String]) -> String {
        format!(
            r#"<html><body><nav><a class="secondary-nav__item">Details</a></nav>{}</body></html>"#,
            body.concat()
        )
    }

    fn simple_page(name: &str) -> String {
        page(&[headlines(&[name, "Jan 1", "Jan 8", "$10,000", "7 days"])])
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn full_contest_page() {
        let first = page(&[
            headlines(&["Acme", "Jan 1", "Jan 8", "$60,500", "7 days"]),
            leaderboard(&[&["#", "Name", "Team"], &["1", "Alice", "x"]]),
        ]);
        let details = page(&[
            headlines(&["Acme", "Jan 1", "Jan 8", "$60,500", "7 days"]),
            leaderboard(&[
                &["#", "Name", "Team", "Total", "High", "QA"],
                &["1", "Alice", "x", "$1,000.50", "200", "N/A"],
                &["2", "Bob", "y", "$500", "150", "12"],
            ]),
            scope_table(&["Totals", "", "", "1234"]),
        ]);
        let renderer = FakeRenderer::default().page("https://c4/acme", first, details);

        let mut processor = Processor::new(renderer, MemorySink::default());
        let summary = processor.run(&urls(&["https://c4/acme"])).await.unwrap();
        assert_eq!(summary, RunSummary { appended: 1, skipped: 0 });

        let (_, sink) = processor.into_parts();
        let record = &sink.rows[0];
        assert_eq!(record.get("Name"), Some(&CellValue::from("Acme")));
        assert_eq!(record.get("Total"), Some(&CellValue::Number(1500.5)));
        assert_eq!(record.get("High"), Some(&CellValue::Number(350.0)));
        assert_eq!(record.get("Solo"), Some(&CellValue::Number(0.0)));
        assert_eq!(record.get("QA"), Some(&CellValue::Number(12.0)));
        assert_eq!(record.get("nSloc"), Some(&CellValue::from("1234")));

        let columns: Vec<&str> = record.columns().collect();
        assert_eq!(columns[5], "Total");
        assert_eq!(&columns[10..], &["URL", "QA", "nSloc"]);
    }

    #[tokio::test]
    async fn without_leaderboard_placeholders_stay_zero() {
        let first = page(&[
            headlines(&["Acme", "Jan 1", "Jan 8", "$60,500", "7 days"]),
            scope_table(&["TOTAL", "5678"]),
        ]);
        let renderer = FakeRenderer::default().page("https://c4/acme", first, String::new());

        let mut processor = Processor::new(renderer, MemorySink::default());
        processor.run(&urls(&["https://c4/acme"])).await.unwrap();

        let (renderer, sink) = processor.into_parts();
        assert_eq!(*renderer.details_opened.borrow(), 0);
        let record = &sink.rows[0];
        for column in ["Total", "High", "Solo", "Med", "Gas"] {
            assert_eq!(record.get(column), Some(&CellValue::Number(0.0)));
        }
        assert_eq!(record.get("nSloc"), Some(&CellValue::from("5678")));
    }

    #[tokio::test]
    async fn network_failure_does_not_stop_later_urls() {
        let renderer = FakeRenderer::default()
            .unreachable("https://c4/down")
            .page("https://c4/up", simple_page("Up"), String::new());

        let mut processor = Processor::new(renderer, MemorySink::default());
        let summary = processor
            .run(&urls(&["https://c4/down", "https://c4/up"]))
            .await
            .unwrap();
        assert_eq!(summary, RunSummary { appended: 1, skipped: 1 });

        let (renderer, sink) = processor.into_parts();
        assert_eq!(renderer.rendered.borrow().len(), 2);
        assert_eq!(sink.rows.len(), 1);
        assert_eq!(sink.rows[0].get("URL"), Some(&CellValue::from("https://c4/up")));
    }

    #[tokio::test]
    async fn malformed_headlines_stop_the_run() {
        let broken = page(&[headlines(&["Acme", "Jan 1", "Jan 8"])]);
        let renderer = FakeRenderer::default()
            .page("https://c4/broken", broken, String::new())
            .page("https://c4/next", simple_page("Next"), String::new());

        let mut processor = Processor::new(renderer, MemorySink::default());
        let result = processor
            .run(&urls(&["https://c4/broken", "https://c4/next"]))
            .await;
        assert!(matches!(result, Err(ScrapeError::Headline(_))));

        let (renderer, sink) = processor.into_parts();
        assert_eq!(*renderer.rendered.borrow(), vec!["https://c4/broken"]);
        assert!(sink.rows.is_empty());
    }

    #[tokio::test]
    async fn running_twice_duplicates_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scraped_data.xlsx");
        let list = urls(&["https://c4/a", "https://c4/b"]);

        for _ in 0..2 {
            let renderer = FakeRenderer::default()
                .page("https://c4/a", simple_page("A"), String::new())
                .page("https://c4/b", simple_page("B"), String::new());
            Processor::new(renderer, XlsxStore::new(&path, "Sheet1"))
                .run(&list)
                .await
                .unwrap();
        }

        use calamine::{open_workbook, Reader, Xlsx};
        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        assert_eq!(range.height(), 1 + 4);
    }
}
