//! Listing crawler
//!
//! Walks the paginated category listing and collects the detail-page links
//! it finds. Listing pages are fetched once, without retries; a page that
//! fails is logged and skipped.

use crate::config::SourceConfig;
use crate::crawler::fetcher::fetch_once;
use crate::url::qualify;
use crate::ProspectError;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Builds the URL of listing page `page` (1-based)
///
/// Page 1 is the bare category URL; later pages add `?page=n`.
pub fn listing_page_url(category_url: &str, page: u32) -> String {
    if page <= 1 {
        category_url.to_string()
    } else {
        format!("{}?page={}", category_url, page)
    }
}

/// Extracts absolute detail-page links from a listing page
///
/// Only hrefs that start with `detail_prefix` are kept.
pub fn extract_detail_links(html: &str, base_url: &Url, detail_prefix: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if href.starts_with(detail_prefix) {
                    if let Some(absolute) = qualify(base_url, href) {
                        links.push(absolute);
                    }
                }
            }
        }
    }

    links
}

/// Walks listing pages `1..=pages` and returns the unique detail links
pub struct ListingCrawler<'a> {
    client: &'a Client,
    source: &'a SourceConfig,
    page_delay: Duration,
    timeout: Duration,
}

impl<'a> ListingCrawler<'a> {
    pub fn new(
        client: &'a Client,
        source: &'a SourceConfig,
        page_delay: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            source,
            page_delay,
            timeout,
        }
    }

    /// Collects detail links from every listing page
    ///
    /// # Returns
    ///
    /// * `Ok(BTreeSet<String>)` - Deduplicated absolute detail URLs
    /// * `Err(ProspectError::NoListings)` - No page yielded a single link
    pub async fn collect_links(&self) -> Result<BTreeSet<String>, ProspectError> {
        let base_url = Url::parse(&self.source.base_url)?;
        let mut links = BTreeSet::new();

        for page in 1..=self.source.pages {
            let url = listing_page_url(&self.source.category_url, page);
            tracing::info!("Scraping listing page {}: {}", page, url);

            match fetch_once(self.client, &url, self.timeout).await {
                Ok(body) => {
                    let found =
                        extract_detail_links(&body, &base_url, &self.source.detail_prefix);
                    tracing::debug!("Listing page {} yielded {} links", page, found.len());
                    links.extend(found);
                }
                Err(e) => {
                    tracing::warn!("Failed to scrape listing page {}: {}", page, e);
                }
            }

            tokio::time::sleep(self.page_delay).await;
        }

        tracing::info!("Total unique links found: {}", links.len());

        if links.is_empty() {
            return Err(ProspectError::NoListings {
                pages: self.source.pages,
            });
        }

        Ok(links)
    }
}
