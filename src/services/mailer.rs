//! Transactional email boundary.
//!
//! Delivery is delegated to a hosted email API; this module only
//! shapes and hands off messages. Nothing here retries; the provider
//! handles queuing and retry on its side.

use std::sync::Mutex;

use serde::Serialize;

use super::ServiceError;

/// One plain-text message ready for handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body_text: String,
}

/// Hands a message to the delivery provider.
pub trait MailTransport: Send + Sync {
    fn send(&self, email: &OutboundEmail) -> Result<(), ServiceError>;
}

/// Production transport posting to the email provider's REST API.
pub struct HttpMailer {
    base_url: String,
    api_key: String,
    from_address: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpMailer {
    pub fn new(base_url: &str, api_key: &str, from_address: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            from_address: from_address.to_string(),
            client,
            timeout_secs,
        }
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl MailTransport for HttpMailer {
    fn send(&self, email: &OutboundEmail) -> Result<(), ServiceError> {
        let url = format!("{}/v1/emails", self.base_url);
        let body = SendRequest {
            from: &self.from_address,
            to: &email.to,
            subject: &email.subject,
            text: &email.body_text,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ServiceError::from_reqwest(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %email.to, subject = %email.subject, "Email handed to provider");
        Ok(())
    }
}

/// Recording transport for tests.
pub struct MockMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MailTransport for MockMailer {
    fn send(&self, email: &OutboundEmail) -> Result<(), ServiceError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(())
    }
}
