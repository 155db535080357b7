//! Outreach email generator
//!
//! Reads the scraped CSV, asks a chat-completion API for a personalized
//! email per business and writes the input back with the drafted emails.

mod generator;
mod llm;
pub mod prompt;

pub use generator::{
    EmailGenerator, GeneratedEmail, GenerationStatus, GenerationSummary, BODY_COLUMN,
    REQUIRED_COLUMNS, STATUS_COLUMN, SUBJECT_COLUMN,
};
pub use llm::{ChatCompleter, LlmError, OpenAiClient};
pub use prompt::{build_prompt, Prospect};

use crate::config::GeneratorConfig;
use crate::ProspectError;
use std::path::Path;

/// Runs the generator against the configured chat-completion endpoint
pub async fn generate_emails(
    config: &GeneratorConfig,
    api_key: String,
    input: &Path,
    limit: Option<usize>,
) -> Result<GenerationSummary, ProspectError> {
    let client = OpenAiClient::new(config, api_key)?;
    let generator = EmailGenerator::new(client, config.clone());
    generator.process_csv(input, limit).await
}
