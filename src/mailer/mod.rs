//! Contact-form mailer
//!
//! A small HTTP service that validates contact-form submissions and
//! forwards them to the site owner by SMTP.
//!
//! # Endpoints
//!
//! | Route | Response |
//! |-------|----------|
//! | `POST /api/contact` | `{success, message}`; 400 on invalid input, 500 when sending fails |
//! | `GET /api/health` | `{status, message, timestamp}` |
//! | `GET /` | `{message, version, endpoints}` |

mod contact;
mod routes;
mod smtp;

pub use contact::{render_contact_email, Contact, ContactRejection, ContactSubmission};
pub use routes::{app, AppState, ContactResponse};
pub use smtp::{MailError, Mailer, SmtpMailer};

use crate::config::MailerConfig;
use crate::ProspectError;
use std::sync::Arc;

/// Serves the contact API until the process is stopped
///
/// # Arguments
///
/// * `config` - Mailer section of the configuration
/// * `password` - SMTP password, read from the environment by the caller
/// * `bind` - Listen address overriding `config.bind`
pub async fn serve(
    config: &MailerConfig,
    password: String,
    bind: Option<&str>,
) -> Result<(), ProspectError> {
    let mailer = SmtpMailer::new(config, password)?;
    let state = AppState::new(Arc::new(mailer), &config.site_name);

    let addr = bind.unwrap_or(&config.bind);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Contact service listening on {} (SMTP relay {}:{})",
        addr,
        config.smtp_host,
        config.smtp_port
    );

    axum::serve(listener, app(state)).await?;
    Ok(())
}
