//! Crawler module for the review-site scrape
//!
//! This module contains the scraping pipeline, including:
//! - HTTP fetching with randomized headers and exponential backoff
//! - Listing-page crawling and detail-link collection
//! - Field extraction through ordered fallback strategies
//! - Overall scrape coordination and pacing

pub mod backoff;
mod coordinator;
pub mod extract;
mod fetcher;
mod headers;
mod listing;
pub mod website;

pub use backoff::{AttemptOutcome, BackoffPolicy, ErrorWindow, RetrySchedule};
pub use coordinator::{error_entry, run_scrape, Coordinator, ScrapeSummary};
pub use extract::{extract_company, extract_company_info, DetailPage};
pub use fetcher::{build_http_client, fetch_once, FetchError, Fetcher};
pub use headers::{random_headers, USER_AGENTS};
pub use listing::{extract_detail_links, listing_page_url, ListingCrawler};
pub use website::resolve_website;

use crate::config::Config;
use crate::ProspectError;

/// Runs a complete scrape
///
/// This is the main entry point of the `scrape` command. It will:
/// 1. Collect detail links from the listing pages
/// 2. Fetch and extract every detail page in turn
/// 3. Write checkpoints, the final CSV and the error log
/// 4. Print the report
///
/// # Returns
///
/// * `Ok(ScrapeSummary)` - Scrape completed, possibly with per-link errors
/// * `Err(ProspectError)` - No links were found or the results could not be written
pub async fn scrape(config: Config) -> Result<ScrapeSummary, ProspectError> {
    run_scrape(config).await
}
