//! Outreach email generation over a CSV of scraped businesses
//!
//! Every processed row gets three extra columns: `email_objet`,
//! `email_corps` and `email_generation_status`. A failed or malformed
//! completion never stops the batch; it only changes the row's status.

use crate::config::GeneratorConfig;
use crate::output::file_timestamp;
use crate::outreach::llm::{ChatCompleter, LlmError};
use crate::outreach::prompt::{build_prompt, Prospect, SYSTEM_PROMPT};
use crate::ProspectError;
use chrono::{DateTime, Local};
use csv::StringRecord;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Input columns the generator reads
pub const REQUIRED_COLUMNS: [&str; 3] = ["nom", "description", "website"];

/// Columns added to the output
pub const SUBJECT_COLUMN: &str = "email_objet";
pub const BODY_COLUMN: &str = "email_corps";
pub const STATUS_COLUMN: &str = "email_generation_status";

/// Outcome of one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Success,
    /// The model answered with something that is not a JSON object
    JsonError,
    /// The completion call itself failed
    GenerationError,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Success => "Succès",
            GenerationStatus::JsonError => "Erreur JSON",
            GenerationStatus::GenerationError => "Erreur génération",
        }
    }
}

/// A drafted email, or what is left of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEmail {
    pub subject: String,
    pub body: String,
    pub status: GenerationStatus,
}

impl GeneratedEmail {
    /// Interprets a completion result
    ///
    /// A JSON object gives `objet` and `corps` (empty when absent). Any
    /// other text keeps the raw answer in the body with [`GenerationStatus::JsonError`].
    pub fn from_completion(completion: Result<String, LlmError>) -> Self {
        let raw = match completion {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Completion failed: {}", e);
                return Self {
                    subject: String::new(),
                    body: String::new(),
                    status: GenerationStatus::GenerationError,
                };
            }
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Object(fields)) => {
                let text = |key: &str| {
                    fields
                        .get(key)
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string()
                };
                Self {
                    subject: text("objet"),
                    body: text("corps"),
                    status: GenerationStatus::Success,
                }
            }
            _ => Self {
                subject: String::new(),
                body: raw,
                status: GenerationStatus::JsonError,
            },
        }
    }
}

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub output_path: PathBuf,
    pub rows: usize,
    pub succeeded: usize,
}

/// Column positions in the input file
struct ColumnLayout {
    name: usize,
    description: usize,
    website: usize,
    subject: usize,
    body: usize,
    status: usize,
    width: usize,
}

impl ColumnLayout {
    /// Locates the input columns and places the generated ones
    ///
    /// Generated columns already present in the input are overwritten.
    fn from_headers(headers: &StringRecord) -> Result<(Self, StringRecord), ProspectError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let require = |column: &str| {
            find(column).ok_or_else(|| ProspectError::MissingColumn(column.to_string()))
        };
        let [name, description, website] = REQUIRED_COLUMNS;
        let name = require(name)?;
        let description = require(description)?;
        let website = require(website)?;

        let mut output_headers = headers.clone();
        let mut place = |column: &str| {
            find(column).unwrap_or_else(|| {
                output_headers.push_field(column);
                output_headers.len() - 1
            })
        };
        let subject = place(SUBJECT_COLUMN);
        let body = place(BODY_COLUMN);
        let status = place(STATUS_COLUMN);
        let width = output_headers.len();

        Ok((
            Self {
                name,
                description,
                website,
                subject,
                body,
                status,
                width,
            },
            output_headers,
        ))
    }

    fn prospect(&self, row: &StringRecord) -> Prospect {
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        Prospect {
            name: field(self.name),
            description: field(self.description),
            website: field(self.website),
        }
    }

    fn output_row(&self, row: &StringRecord, email: &GeneratedEmail) -> StringRecord {
        let mut fields: Vec<&str> = row.iter().collect();
        fields.resize(self.width, "");
        fields[self.subject] = &email.subject;
        fields[self.body] = &email.body;
        fields[self.status] = email.status.as_str();
        StringRecord::from(fields)
    }
}

/// Drafts outreach emails with a chat-completion backend
pub struct EmailGenerator<C> {
    completer: C,
    config: GeneratorConfig,
}

impl<C: ChatCompleter> EmailGenerator<C> {
    pub fn new(completer: C, config: GeneratorConfig) -> Self {
        Self { completer, config }
    }

    /// Drafts one email
    pub async fn generate(&self, prospect: &Prospect) -> GeneratedEmail {
        let prompt = build_prompt(&self.config, prospect);
        GeneratedEmail::from_completion(self.completer.complete(SYSTEM_PROMPT, &prompt).await)
    }

    /// Path of the output file for a run started at `now`
    pub fn output_path(&self, now: &DateTime<Local>) -> PathBuf {
        Path::new(&self.config.output_directory).join(format!(
            "{}_{}.csv",
            self.config.output_prefix,
            file_timestamp(now)
        ))
    }

    /// Processes the first rows of `input` and writes the augmented CSV
    ///
    /// # Arguments
    ///
    /// * `input` - CSV with at least `nom`, `description` and `website`
    /// * `limit` - Row limit, overriding `max-rows` from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(GenerationSummary)` - Output written; individual rows may have failed
    /// * `Err(ProspectError)` - The input could not be read or lacks a column
    pub async fn process_csv(
        &self,
        input: &Path,
        limit: Option<usize>,
    ) -> Result<GenerationSummary, ProspectError> {
        tracing::info!("Loading CSV file: {}", input.display());
        let mut reader = csv::Reader::from_path(input)?;
        let headers = reader.headers()?.clone();
        let (layout, output_headers) = ColumnLayout::from_headers(&headers)?;

        let mut rows = Vec::new();
        for row in reader.records() {
            rows.push(row?);
        }
        tracing::info!("Businesses found: {}", rows.len());

        let max = limit.unwrap_or(self.config.max_rows);
        if max > 0 && rows.len() > max {
            tracing::info!("Using the first {} businesses", max);
            rows.truncate(max);
        }

        let delay = Duration::from_millis(self.config.request_delay_ms);
        let total = rows.len();
        let mut output_rows = Vec::with_capacity(total);
        let mut succeeded = 0;

        for (i, row) in rows.iter().enumerate() {
            let prospect = layout.prospect(row);
            tracing::info!("Generating email for {} ({}/{})", prospect.name, i + 1, total);

            let email = self.generate(&prospect).await;
            match email.status {
                GenerationStatus::Success => {
                    succeeded += 1;
                    tracing::info!("Email generated for {}", prospect.name);
                }
                GenerationStatus::JsonError => {
                    tracing::warn!("Non-JSON answer for {}", prospect.name)
                }
                GenerationStatus::GenerationError => {
                    tracing::warn!("Generation failed for {}", prospect.name)
                }
            }
            output_rows.push(layout.output_row(row, &email));

            if i + 1 < total {
                tokio::time::sleep(delay).await;
            }
        }

        let output_path = self.output_path(&Local::now());
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&output_path)?;
        writer.write_record(&output_headers)?;
        for row in &output_rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        tracing::info!("Output saved: {}", output_path.display());
        tracing::info!("Emails generated: {}/{}", succeeded, total);

        Ok(GenerationSummary {
            output_path,
            rows: total,
            succeeded,
        })
    }
}
