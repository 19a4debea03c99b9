//! Candidate notifications for application status changes.
//!
//! A [`Dispatcher`] validates the request, renders the HTML body and hands the
//! finished message to whichever [`MailTransport`] the configuration selects.
//! Every call is a single delivery attempt.

mod api;
mod smtp;
mod template;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{MailConfig, MailTransportConfig};

pub use api::ApiTransport;
pub use smtp::SmtpTransport;
pub use template::render_status_email;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Recipient email is required")]
    MissingRecipient,

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Mail server rejected {stage}: {code} {message}")]
    Rejected {
        stage: &'static str,
        code: u16,
        message: String,
    },
}

impl From<std::io::Error> for NotifyError {
    fn from(e: std::io::Error) -> Self {
        NotifyError::Transport(e.to_string())
    }
}

/// Flat record describing one status change, as handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEmail {
    pub to: String,
    pub candidate_name: String,
    pub job_title: String,
    pub status: String,
    pub assignment_name: Option<String>,
    pub assignment_link: Option<String>,
}

impl StatusEmail {
    pub fn validate(&self) -> Result<(), NotifyError> {
        let to = self.to.trim();
        if to.is_empty() {
            return Err(NotifyError::MissingRecipient);
        }
        if to.chars().any(char::is_control) || !to.contains('@') {
            return Err(NotifyError::InvalidRecipient(to.to_string()));
        }
        Ok(())
    }

    /// Both assignment fields, when both are present, non-blank and the link
    /// is a web address.
    pub fn assignment(&self) -> Option<(&str, &str)> {
        match (self.assignment_name.as_deref(), self.assignment_link.as_deref()) {
            (Some(name), Some(link)) if !name.trim().is_empty() && is_web_link(link) => {
                Some((name, link))
            }
            _ => None,
        }
    }

    pub fn subject(&self) -> String {
        header_safe(&format!("Application Update - {}", self.job_title))
    }
}

/// A rendered message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

pub trait MailTransport: Send + Sync {
    fn name(&self) -> &'static str;

    fn send(&self, mail: &OutgoingMail) -> Result<(), NotifyError>;
}

/// Seam used by the status workflow.
pub trait Notifier: Send + Sync {
    fn notify(&self, email: &StatusEmail) -> Result<(), NotifyError>;
}

pub struct Dispatcher {
    from: String,
    transport: Box<dyn MailTransport>,
}

impl Dispatcher {
    pub fn new(from: impl Into<String>, transport: Box<dyn MailTransport>) -> Self {
        Self {
            from: header_safe(&from.into()),
            transport,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        let transport: Box<dyn MailTransport> = match &config.transport {
            MailTransportConfig::Log => Box::new(LogTransport),
            MailTransportConfig::Smtp(smtp) => Box::new(SmtpTransport::new(smtp.clone())),
            MailTransportConfig::Api(api) => Box::new(ApiTransport::new(api.clone())),
        };
        Self::new(config.from.clone(), transport)
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    pub fn prepare(&self, email: &StatusEmail) -> Result<OutgoingMail, NotifyError> {
        email.validate()?;
        Ok(OutgoingMail {
            from: self.from.clone(),
            to: email.to.trim().to_string(),
            subject: email.subject(),
            html_body: render_status_email(email)?,
        })
    }
}

impl Notifier for Dispatcher {
    fn notify(&self, email: &StatusEmail) -> Result<(), NotifyError> {
        let mail = self.prepare(email)?;
        self.transport.send(&mail)?;
        tracing::info!(
            to = %mail.to,
            transport = self.transport.name(),
            status = %email.status,
            "status email sent"
        );
        Ok(())
    }
}

/// Development transport: records the message in the log and succeeds.
pub struct LogTransport;

impl MailTransport for LogTransport {
    fn name(&self) -> &'static str {
        "log"
    }

    fn send(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        tracing::info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            bytes = mail.html_body.len(),
            "mail transport disabled, message logged only"
        );
        Ok(())
    }
}

/// Only `http://` and `https://` links may end up in an email anchor.
pub fn is_web_link(link: &str) -> bool {
    let link = link.trim().to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| link.len() > scheme.len() && link.starts_with(scheme))
}

/// Strips line breaks so a value cannot start a new header line.
pub(crate) fn header_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
