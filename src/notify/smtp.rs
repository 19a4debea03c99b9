use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::Transport;

use super::{MailTransport, NotifyError, OutgoingMail};
use crate::config::{SmtpConfig, SmtpSecurity};

const IO_TIMEOUT: Duration = Duration::from_secs(30);

/// SMTP submission over TLS, either implicit or upgraded with STARTTLS.
pub struct SmtpTransport {
    config: SmtpConfig,
}

impl SmtpTransport {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn relay(&self) -> Result<lettre::SmtpTransport, NotifyError> {
        let host = self.config.host.as_str();
        let params = TlsParameters::new(host.to_string())
            .map_err(|e| NotifyError::Transport(format!("TLS setup failed: {}", e)))?;
        let tls = match self.config.security {
            SmtpSecurity::StartTls => Tls::Required(params),
            SmtpSecurity::Implicit => Tls::Wrapper(params),
        };

        Ok(lettre::SmtpTransport::builder_dangerous(host)
            .port(self.config.port)
            .tls(tls)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .timeout(Some(IO_TIMEOUT))
            .build())
    }
}

/// Builds the MIME message. Header encoding and body line limits are
/// handled by the builder.
fn build_message(mail: &OutgoingMail) -> Result<Message, NotifyError> {
    let from: Mailbox = mail
        .from
        .parse()
        .map_err(|e| NotifyError::Transport(format!("Invalid sender address '{}': {}", mail.from, e)))?;
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|_| NotifyError::InvalidRecipient(mail.to.clone()))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(mail.html_body.clone())
        .map_err(|e| NotifyError::Transport(format!("Failed to build message: {}", e)))
}

impl MailTransport for SmtpTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    fn send(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        let message = build_message(mail)?;
        self.relay()?.send(&message).map_err(|e| match e.status() {
            Some(code) => NotifyError::Rejected {
                stage: "SMTP delivery",
                code: code.to_string().parse().unwrap_or_default(),
                message: e.to_string(),
            },
            None => NotifyError::Transport(format!(
                "SMTP delivery to {}:{} failed: {}",
                self.config.host, self.config.port, e
            )),
        })?;
        Ok(())
    }
}
