//! Secrets read from the process environment
//!
//! Credentials are read once, when a command starts, and handed to the
//! components that need them. A missing secret stops the command before any
//! work is done.

use crate::ConfigError;

/// Environment variable holding the chat-completion API key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// A required credential resolved from the environment
pub struct Secrets;

impl Secrets {
    /// Loads a `.env` file from the working directory, if there is one
    pub fn load_dotenv() {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
    }

    /// Reads a required secret
    ///
    /// Empty values count as missing.
    pub fn require(name: &str) -> Result<String, ConfigError> {
        Self::require_from(name, |key| std::env::var(key).ok())
    }

    /// Reads a required secret through an arbitrary lookup
    pub fn require_from<F>(name: &str, lookup: F) -> Result<String, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(name) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingSecret(name.to_string())),
        }
    }
}
