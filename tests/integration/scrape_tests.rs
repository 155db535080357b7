//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to stand in for the review site and run the
//! full listing-to-CSV cycle end-to-end with near-zero delays.

use gem_prospector::config::{Config, OutputConfig, ScraperConfig, SourceConfig};
use gem_prospector::crawler::Coordinator;
use gem_prospector::output::read_records;
use gem_prospector::{ErrorKind, ProspectError};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DETAIL_PAGE: &str = r#"
    <html><body>
        <h1>Bijouterie Alpha</h1>
        <ul>
            <li class="styles_itemRow__74s4a">
                <a href="mailto:contact@alpha-bijoux.fr">contact@alpha-bijoux.fr</a>
            </li>
            <li class="styles_itemRow__74s4a">
                <a href="tel:+33102030405">01 02 03 04 05</a>
            </li>
        </ul>
    </body></html>
"#;

/// Creates a fast configuration pointing at the mock server
fn create_test_config(server: &MockServer, out_dir: &TempDir, pages: u32) -> Config {
    Config {
        source: SourceConfig {
            base_url: server.uri(),
            category_url: format!("{}/categories/jewelry_store", server.uri()),
            detail_prefix: "/review/".to_string(),
            pages,
        },
        scraper: ScraperConfig {
            max_retries: 2,
            base_delay_ms: 1,
            max_jitter_ms: 0,
            listing_delay_ms: 0,
            min_pause_ms: 0,
            max_pause_ms: 0,
            cooldown_ms: 0,
            ..ScraperConfig::default()
        },
        output: OutputConfig {
            directory: out_dir.path().to_string_lossy().to_string(),
            checkpoint_interval: 2,
            ..OutputConfig::default()
        },
        ..Config::default()
    }
}

async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/categories/jewelry_store"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/review/alpha-bijoux.fr">Alpha</a>
               <a href="/review/empty-shop.fr">Empty</a>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/categories/jewelry_store"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/review/alpha-bijoux.fr">Alpha</a>
               <a href="/review/blocked-shop.fr">Blocked</a>
               <a href="/categories/watches">Watches</a>"#,
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scrape() {
    let server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();
    mount_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/review/alpha-bijoux.fr"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    // Blocked on every attempt
    Mock::given(method("GET"))
        .and(path("/review/blocked-shop.fr"))
        .respond_with(ResponseTemplate::new(403))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/review/empty-shop.fr"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &out_dir, 2);
    let mut coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.unwrap();

    // One record per unique link, in link order
    assert_eq!(summary.records.len(), 3);
    let links: Vec<&str> = summary
        .records
        .iter()
        .map(|r| r.source_link.as_str())
        .collect();
    assert_eq!(
        links,
        vec![
            format!("{}/review/alpha-bijoux.fr", server.uri()),
            format!("{}/review/blocked-shop.fr", server.uri()),
            format!("{}/review/empty-shop.fr", server.uri()),
        ]
    );

    let alpha = &summary.records[0];
    assert_eq!(alpha.name, "Bijouterie Alpha");
    assert_eq!(alpha.email, "contact@alpha-bijoux.fr");
    assert_eq!(alpha.phone, "01 02 03 04 05");

    // Failed and empty pages still produce a record
    assert!(summary.records[1].has_no_data());
    assert!(summary.records[2].has_no_data());

    let kinds: Vec<ErrorKind> = summary.errors.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::Blocked, ErrorKind::NoData]);
    assert_eq!(summary.report.blocked, 1);
    assert_eq!(summary.report.no_data, 1);
    assert_eq!(summary.report.with_data, 1);

    // Checkpoint after two records, then the final file and the error log
    let checkpoint = out_dir.path().join("trustpilot_partial_2_entries.csv");
    assert_eq!(read_records(&checkpoint).unwrap().len(), 2);

    let final_path = summary.final_path.expect("final CSV should be written");
    assert_eq!(read_records(&final_path).unwrap(), summary.records);

    let error_log = summary.error_log_path.expect("error log should be written");
    let log = std::fs::read_to_string(error_log).unwrap();
    assert!(log.starts_with("Error report - "));
    assert!(log.contains("blocked-shop.fr (403)"));
    assert!(log.contains("No data extracted:"));
}

#[tokio::test]
async fn test_clean_scrape_writes_no_error_log() {
    let server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/categories/jewelry_store"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/review/alpha-bijoux.fr">Alpha</a>"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/review/alpha-bijoux.fr"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_PAGE))
        .mount(&server)
        .await;

    let config = create_test_config(&server, &out_dir, 1);
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.records.len(), 1);
    assert!(summary.errors.is_empty());
    assert!(summary.final_path.is_some());
    assert!(summary.error_log_path.is_none());
}

#[tokio::test]
async fn test_server_error_is_retried_then_recorded() {
    let server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/categories/jewelry_store"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<a href="/review/down.fr">Down</a>"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/review/down.fr"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &out_dir, 1);
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    // One attempt per retry, then the link is recorded and skipped
    assert_eq!(summary.records.len(), 1);
    assert!(summary.records[0].has_no_data());
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].kind, ErrorKind::Network);
    assert!(summary.errors[0].detail.contains("HTTP 500"));
}

#[tokio::test]
async fn test_no_links_aborts() {
    let server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let config = create_test_config(&server, &out_dir, 3);
    let result = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(result, Err(ProspectError::NoListings { pages: 3 })));
    assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 0);
}
