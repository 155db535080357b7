//! Gem-Prospector main entry point
//!
//! This is the command-line interface for the outreach toolkit: scraper,
//! email generator and contact mailer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use gem_prospector::config::{load_config_with_hash, Config, Secrets, OPENAI_API_KEY};
use gem_prospector::crawler::scrape;
use gem_prospector::mailer::serve;
use gem_prospector::outreach::generate_emails;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gem-Prospector: a business-outreach toolkit
///
/// Scrapes jewellery-store listings from a review site, drafts personalized
/// outreach emails for them and serves a contact form that forwards
/// submissions by email.
#[derive(Parser, Debug)]
#[command(name = "gem-prospector")]
#[command(version = "1.0.0")]
#[command(about = "A business-outreach toolkit", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration and print the effective settings
    CheckConfig,

    /// Scrape the listing and detail pages into a CSV
    Scrape,

    /// Draft outreach emails for the businesses of a scraped CSV
    GenerateEmails {
        /// CSV with at least the nom, description and website columns
        #[arg(short, long, value_name = "CSV")]
        input: PathBuf,

        /// Process only the first N rows (overrides max-rows; 0 processes all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Serve the contact-form API
    Serve {
        /// Listen address (overrides mailer.bind)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);
    Secrets::load_dotenv();

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::CheckConfig => handle_check_config(&config),
        Command::Scrape => handle_scrape(config).await,
        Command::GenerateEmails { input, limit } => {
            handle_generate_emails(&config, input, limit).await
        }
        Command::Serve { bind } => handle_serve(&config, bind).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gem_prospector=info,warn"),
            1 => EnvFilter::new("gem_prospector=debug,info"),
            2 => EnvFilter::new("gem_prospector=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `check-config`: prints the effective configuration
fn handle_check_config(config: &Config) -> anyhow::Result<()> {
    println!("=== Gem-Prospector Configuration ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  Category: {}", config.source.category_url);
    println!("  Detail prefix: {}", config.source.detail_prefix);
    println!("  Listing pages: 1..={}", config.source.pages);

    let scraper = &config.scraper;
    println!("\nScraper:");
    println!("  Max retries: {}", scraper.max_retries);
    println!(
        "  Backoff: {}ms * 2^attempt + up to {}ms jitter",
        scraper.base_delay_ms, scraper.max_jitter_ms
    );
    println!(
        "  Pause between pages: {}..{}ms (listing: {}ms)",
        scraper.min_pause_ms, scraper.max_pause_ms, scraper.listing_delay_ms
    );
    println!(
        "  Cool-down: {}ms when more than {} of the last {} errors are blocked",
        scraper.cooldown_ms, scraper.blocked_threshold, scraper.error_window
    );
    println!(
        "  Timeouts: listing {}s, detail {}s",
        scraper.listing_timeout_secs, scraper.detail_timeout_secs
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!(
        "  Checkpoint every {} records",
        config.output.checkpoint_interval
    );

    let generator = &config.generator;
    println!("\nEmail generator:");
    println!("  Endpoint: {}", generator.endpoint);
    println!(
        "  Model: {} (temperature {}, {} max tokens)",
        generator.model, generator.temperature, generator.max_tokens
    );
    match generator.row_limit() {
        Some(rows) => println!("  Rows: first {}", rows),
        None => println!("  Rows: all"),
    }
    println!("  Output directory: {}", generator.output_directory);

    let mailer = &config.mailer;
    println!("\nMailer:");
    println!("  Bind: {}", mailer.bind);
    println!("  SMTP: {}:{} as {}", mailer.smtp_host, mailer.smtp_port, mailer.address);
    println!("  Password variable: {}", mailer.password_env);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles `scrape`
async fn handle_scrape(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} listing pages of {}",
        config.source.pages,
        config.source.category_url
    );

    match scrape(config).await {
        Ok(summary) => {
            tracing::info!(
                "Scrape completed: {} records, {} errors",
                summary.records.len(),
                summary.errors.len()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles `generate-emails`
async fn handle_generate_emails(
    config: &Config,
    input: PathBuf,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let api_key = Secrets::require(OPENAI_API_KEY)?;

    anyhow::ensure!(input.exists(), "Input file {} does not exist", input.display());

    let summary = generate_emails(&config.generator, api_key, &input, limit).await?;

    println!("\nSummary:");
    println!(
        "- Emails generated successfully: {}/{}",
        summary.succeeded, summary.rows
    );
    println!("- Output file: {}", summary.output_path.display());

    Ok(())
}

/// Handles `serve`
async fn handle_serve(config: &Config, bind: Option<String>) -> anyhow::Result<()> {
    let password = Secrets::require(&config.mailer.password_env)?;
    serve(&config.mailer, password, bind.as_deref()).await?;
    Ok(())
}
