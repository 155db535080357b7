//! Scrape coordinator - the linear scrape pipeline
//!
//! Listing crawl, then for every link in turn:
//! fetch with retry, extract, record, pause.
//! Results and errors are written once every link has been processed.

use crate::config::Config;
use crate::crawler::backoff::{random_pause, BackoffPolicy, ErrorWindow};
use crate::crawler::extract::extract_company_info;
use crate::crawler::fetcher::{build_http_client, FetchError, Fetcher};
use crate::crawler::listing::ListingCrawler;
use crate::output::{print_report, ResultWriter, ScrapeReport};
use crate::record::{CompanyRecord, ErrorEntry};
use crate::url::site_domain;
use crate::ProspectError;
use chrono::Local;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Outcome of a completed scrape
#[derive(Debug)]
pub struct ScrapeSummary {
    /// One record per unique link, in processing order
    pub records: Vec<CompanyRecord>,
    pub errors: Vec<ErrorEntry>,
    pub report: ScrapeReport,
    pub final_path: Option<PathBuf>,
    pub error_log_path: Option<PathBuf>,
}

/// Main scrape coordinator
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
    source_site: String,
    window: ErrorWindow,
    errors: Vec<ErrorEntry>,
}

impl Coordinator {
    /// Creates a coordinator with its own HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ProspectError)` - The base URL or the HTTP client is unusable
    pub fn new(config: Config) -> Result<Self, ProspectError> {
        let base_url = Url::parse(&config.source.base_url)?;
        let source_site = site_domain(base_url.host_str().unwrap_or_default());

        let fetcher = Fetcher::new(
            build_http_client()?,
            BackoffPolicy::from_config(&config.scraper),
            Duration::from_secs(config.scraper.detail_timeout_secs),
        );
        let window = ErrorWindow::from_config(&config.scraper);

        Ok(Self {
            config,
            fetcher,
            source_site,
            window,
            errors: Vec::new(),
        })
    }

    /// Walks the listing pages
    pub async fn collect_links(&self) -> Result<BTreeSet<String>, ProspectError> {
        let crawler = ListingCrawler::new(
            self.fetcher.client(),
            &self.config.source,
            Duration::from_millis(self.config.scraper.listing_delay_ms),
            Duration::from_secs(self.config.scraper.listing_timeout_secs),
        );
        crawler.collect_links().await
    }

    /// Runs the whole pipeline
    ///
    /// Per-link failures are recorded and never abort the run; the only
    /// fatal precondition is an empty link set.
    pub async fn run(&mut self) -> Result<ScrapeSummary, ProspectError> {
        let links = self.collect_links().await?;
        let total = links.len();
        let mut writer = ResultWriter::new(self.config.output.clone());
        let start_time = std::time::Instant::now();

        for (i, link) in links.iter().enumerate() {
            tracing::info!("[{}/{}] Scraping {}", i + 1, total, link);

            let record = self.scrape_link(link).await;
            writer.push(record);

            if i + 1 < total {
                tokio::time::sleep(self.next_pause()).await;
            }
        }

        tracing::info!(
            "Scrape completed: {} links processed in {:?}",
            total,
            start_time.elapsed()
        );

        let now = Local::now();
        let final_path = writer.write_final(&now)?;
        if let Some(path) = &final_path {
            tracing::info!("Final results saved to {}", path.display());
        }
        let error_log_path = writer.write_errors(&self.errors, &now)?;
        if let Some(path) = &error_log_path {
            tracing::info!("Error log saved to {}", path.display());
        }

        let records = writer.into_records();
        let report = ScrapeReport::build(total, &records, &self.errors);
        print_report(&report);

        Ok(ScrapeSummary {
            records,
            errors: std::mem::take(&mut self.errors),
            report,
            final_path,
            error_log_path,
        })
    }

    /// Fetches and extracts one detail page
    ///
    /// Always yields a record: an empty one when the fetch failed.
    async fn scrape_link(&mut self, link: &str) -> CompanyRecord {
        match self.fetcher.fetch_with_retry(link).await {
            Ok(body) => {
                let record = extract_company_info(&body, link, &self.source_site);
                if record.has_no_data() {
                    tracing::warn!("No data extracted for {}", link);
                    self.record_error(ErrorEntry::no_data(link));
                } else {
                    tracing::info!("{}/9 fields filled", record.filled_count());
                }
                record
            }
            Err(e) => {
                tracing::warn!("Giving up on {}: {}", link, e);
                self.record_error(error_entry(link, &e));
                CompanyRecord::empty(link)
            }
        }
    }

    fn record_error(&mut self, entry: ErrorEntry) {
        self.window.record(entry.is_blocked());
        self.errors.push(entry);
    }

    /// Pause before the next detail page
    fn next_pause(&self) -> Duration {
        let scraper = &self.config.scraper;
        if self.window.should_cool_down() {
            tracing::warn!(
                "{} of the last {} errors were blocked requests, cooling down",
                self.window.blocked_count(),
                self.window.len()
            );
            Duration::from_millis(scraper.cooldown_ms)
        } else {
            random_pause(
                Duration::from_millis(scraper.min_pause_ms),
                Duration::from_millis(scraper.max_pause_ms),
            )
        }
    }
}

/// Classifies a failed fetch for the error log
pub fn error_entry(link: &str, error: &FetchError) -> ErrorEntry {
    if error.is_blocked() {
        ErrorEntry::blocked(link, error.to_string())
    } else {
        ErrorEntry::network(link, error.to_string())
    }
}

/// Runs a complete scrape
pub async fn run_scrape(config: Config) -> Result<ScrapeSummary, ProspectError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
