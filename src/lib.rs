//! Gem-Prospector: a business-outreach toolkit
//!
//! This crate bundles the three pieces of a jewellery-store outreach workflow:
//! a polite scraper that collects business listings from a review site, an
//! email generator that drafts personalized outreach emails through a
//! chat-completion API, and a small contact-form service that forwards
//! submissions by SMTP.

pub mod config;
pub mod crawler;
pub mod mailer;
pub mod output;
pub mod outreach;
pub mod record;
pub mod url;

use thiserror::Error;

/// Main error type for Gem-Prospector operations
#[derive(Debug, Error)]
pub enum ProspectError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("No detail links found on {pages} listing page(s)")]
    NoListings { pages: u32 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}' in input CSV")]
    MissingColumn(String),

    #[error("Language model error: {0}")]
    Llm(#[from] outreach::LlmError),

    #[error("Mail error: {0}")]
    Mail(#[from] mailer::MailError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Required secret {0} is not set in the environment")]
    MissingSecret(String),
}

/// Result type alias for Gem-Prospector operations
pub type Result<T> = std::result::Result<T, ProspectError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{CompanyRecord, ErrorEntry, ErrorKind};
pub use url::extract_domain;
