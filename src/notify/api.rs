use std::time::Duration;

use serde::Serialize;

use super::{MailTransport, NotifyError, OutgoingMail};
use crate::config::ApiMailConfig;

/// HTTP email-sending service authenticated with a bearer API key.
///
/// Sends block, so they must run off the async executor (`web::block`). The
/// client is built per send for the same reason: a blocking client may not be
/// created or dropped inside the runtime.
pub struct ApiTransport {
    config: ApiMailConfig,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl ApiTransport {
    pub fn new(config: ApiMailConfig) -> Self {
        Self { config }
    }
}

impl MailTransport for ApiTransport {
    fn name(&self) -> &'static str {
        "api"
    }

    fn send(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        let body = SendRequest {
            from: &mail.from,
            to: [&mail.to],
            subject: &mail.subject,
            html: &mail.html_body,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotifyError::Transport(format!("HTTP client setup failed: {}", e)))?;

        let response = client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| NotifyError::Transport(format!("Email API request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().unwrap_or_default();
        Err(NotifyError::Rejected {
            stage: "email API",
            code: status.as_u16(),
            message: text,
        })
    }
}
