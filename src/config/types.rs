use serde::Deserialize;

/// Main configuration structure for Gem-Prospector
///
/// Every section falls back to its defaults, so an empty file is a valid
/// configuration. Secrets are never read from here; see [`super::Secrets`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub generator: GeneratorConfig,
    pub mailer: MailerConfig,
}

/// The review site being scraped
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Scheme and host of the review site, used to qualify relative links
    pub base_url: String,

    /// First listing page of the category
    pub category_url: String,

    /// Path prefix identifying detail pages
    pub detail_prefix: String,

    /// Number of listing pages to walk (1..=pages)
    pub pages: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://fr.trustpilot.com".to_string(),
            category_url: "https://fr.trustpilot.com/categories/jewelry_store".to_string(),
            detail_prefix: "/review/".to_string(),
            pages: 40,
        }
    }
}

/// Request pacing and retry behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScraperConfig {
    /// Attempts per detail page before giving up
    pub max_retries: u32,

    /// Base delay of the exponential backoff (milliseconds)
    pub base_delay_ms: u64,

    /// Upper bound of the random jitter added to each backoff (milliseconds)
    pub max_jitter_ms: u64,

    /// Fixed pause between listing pages (milliseconds)
    pub listing_delay_ms: u64,

    /// Random pause between detail pages, lower bound (milliseconds)
    pub min_pause_ms: u64,

    /// Random pause between detail pages, upper bound (milliseconds)
    pub max_pause_ms: u64,

    /// Pause applied when too many recent errors were blocking responses (milliseconds)
    pub cooldown_ms: u64,

    /// Number of recent errors considered for the cool-down decision
    pub error_window: usize,

    /// Cool down when strictly more than this many recent errors were 403s
    pub blocked_threshold: usize,

    /// Socket timeout for listing pages (seconds)
    pub listing_timeout_secs: u64,

    /// Socket timeout for detail pages (seconds)
    pub detail_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            max_jitter_ms: 1000,
            listing_delay_ms: 1000,
            min_pause_ms: 1500,
            max_pause_ms: 3000,
            cooldown_ms: 30_000,
            error_window: 10,
            blocked_threshold: 5,
            listing_timeout_secs: 10,
            detail_timeout_secs: 15,
        }
    }
}

/// Where and how scrape results are written
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving checkpoints, final results and error logs
    pub directory: String,

    /// Write a checkpoint every this many records
    pub checkpoint_interval: usize,

    /// File name prefix of checkpoint files
    pub checkpoint_prefix: String,

    /// File name prefix of the final results file
    pub final_prefix: String,

    /// File name prefix of the error log
    pub error_log_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            checkpoint_interval: 25,
            checkpoint_prefix: "trustpilot_partial".to_string(),
            final_prefix: "trustpilot_bijouteries_final".to_string(),
            error_log_prefix: "trustpilot_scraping_errors".to_string(),
        }
    }
}

/// Outreach email generation
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// Chat-completion endpoint
    pub endpoint: String,

    pub model: String,

    pub temperature: f32,

    pub max_tokens: u32,

    /// Only the first rows of the input are processed; `0` processes all
    pub max_rows: usize,

    /// Pause between two completion calls (milliseconds)
    pub request_delay_ms: u64,

    /// Name used to sign the emails
    pub sender_name: String,

    pub sender_phone: String,

    /// Public website of the sender
    pub website_url: String,

    /// Booking page offered in the emails
    pub booking_url: String,

    pub language: String,

    /// Directory receiving the generated CSV
    pub output_directory: String,

    pub output_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            max_rows: 10,
            request_delay_ms: 1000,
            sender_name: "Nicolas Musicki".to_string(),
            sender_phone: "07 56 93 16 47".to_string(),
            website_url: "https://magickbot.com/".to_string(),
            booking_url: "https://magickbot.zohobookings.eu/#/magickbot".to_string(),
            language: "français".to_string(),
            output_directory: "data".to_string(),
            output_prefix: "bijouteries_avec_emails".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Rows to process, `None` meaning every row
    pub fn row_limit(&self) -> Option<usize> {
        (self.max_rows > 0).then_some(self.max_rows)
    }
}

/// Contact-form service and its SMTP relay
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MailerConfig {
    /// Address the HTTP service listens on
    pub bind: String,

    pub smtp_host: String,

    /// STARTTLS submission port
    pub smtp_port: u16,

    /// Account used both as sender and recipient of contact messages
    pub address: String,

    /// Environment variable holding the SMTP password
    pub password_env: String,

    /// Site name shown in subjects and API responses
    pub site_name: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            smtp_host: "smtp.zoho.eu".to_string(),
            smtp_port: 587,
            address: "contact@magickbot.com".to_string(),
            password_env: "EMAIL_PASSWORD".to_string(),
            site_name: "Magickbot".to_string(),
        }
    }
}
