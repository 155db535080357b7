//! Integration tests for Gem-Prospector

mod scrape_tests;
