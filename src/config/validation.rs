use crate::config::types::{
    Config, GeneratorConfig, MailerConfig, OutputConfig, ScraperConfig, SourceConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_generator_config(&config.generator)?;
    validate_mailer_config(&config.mailer)?;
    Ok(())
}

/// Validates the review-site description
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;
    validate_http_url("category_url", &config.category_url)?;

    if !config.detail_prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "detail_prefix must start with '/', got '{}'",
            config.detail_prefix
        )));
    }

    if config.pages < 1 {
        return Err(ConfigError::Validation(
            "pages must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates pacing and retry settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.min_pause_ms > config.max_pause_ms {
        return Err(ConfigError::Validation(format!(
            "min_pause_ms ({}) must not exceed max_pause_ms ({})",
            config.min_pause_ms, config.max_pause_ms
        )));
    }

    if config.error_window < 1 {
        return Err(ConfigError::Validation(
            "error_window must be >= 1".to_string(),
        ));
    }

    if config.blocked_threshold >= config.error_window {
        return Err(ConfigError::Validation(format!(
            "blocked_threshold ({}) must be lower than error_window ({})",
            config.blocked_threshold, config.error_window
        )));
    }

    if config.listing_timeout_secs == 0 || config.detail_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request timeouts must be at least one second".to_string(),
        ));
    }

    Ok(())
}

/// Validates output settings
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.checkpoint_interval < 1 {
        return Err(ConfigError::Validation(
            "checkpoint_interval must be >= 1".to_string(),
        ));
    }

    for (name, prefix) in [
        ("checkpoint_prefix", &config.checkpoint_prefix),
        ("final_prefix", &config.final_prefix),
        ("error_log_prefix", &config.error_log_prefix),
    ] {
        validate_file_prefix(name, prefix)?;
    }

    Ok(())
}

/// Validates the email generator settings
fn validate_generator_config(config: &GeneratorConfig) -> Result<(), ConfigError> {
    validate_http_url("endpoint", &config.endpoint)?;
    validate_http_url("website_url", &config.website_url)?;
    validate_http_url("booking_url", &config.booking_url)?;

    if config.model.is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "temperature must be between 0 and 2, got {}",
            config.temperature
        )));
    }

    if config.max_tokens < 1 {
        return Err(ConfigError::Validation(
            "max_tokens must be >= 1".to_string(),
        ));
    }

    validate_file_prefix("output_prefix", &config.output_prefix)?;

    Ok(())
}

/// Validates the contact mailer settings
fn validate_mailer_config(config: &MailerConfig) -> Result<(), ConfigError> {
    if config.smtp_host.is_empty() {
        return Err(ConfigError::Validation(
            "smtp_host cannot be empty".to_string(),
        ));
    }

    if config.password_env.is_empty() {
        return Err(ConfigError::Validation(
            "password_env cannot be empty".to_string(),
        ));
    }

    validate_email(&config.address)?;

    Ok(())
}

fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            name, value
        )));
    }

    Ok(())
}

/// File name prefixes must not escape the output directory
fn validate_file_prefix(name: &str, prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() || prefix.contains('/') || prefix.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "{} must be a non-empty file name prefix, got '{}'",
            name, prefix
        )));
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "mailer address cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
