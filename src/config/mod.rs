//! Configuration module for Gem-Prospector
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and reading the secrets each command needs from the environment.
//!
//! # Example
//!
//! ```no_run
//! use gem_prospector::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("prospector.toml")).unwrap();
//! println!("Listing pages to walk: {}", config.source.pages);
//! ```

mod parser;
mod secrets;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, GeneratorConfig, MailerConfig, OutputConfig, ScraperConfig, SourceConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, config_hash, load_config, load_config_with_hash, parse_config,
};
pub use secrets::{Secrets, OPENAI_API_KEY};
