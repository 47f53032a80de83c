use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use log::{error, info};

pub const SUBJECT: &str = "Internship Alert Subscription";

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mail relay rejected the message with status {status}")]
    Rejected { status: u16 },
}

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Email is required.")]
    MissingEmail,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Error sending email. Please try again later.")]
    Delivery(#[source] MailError),
}

/// Delivers a plain-text message to one recipient.
pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Posts messages as JSON to an HTTP mail relay.
pub struct HttpMailer {
    endpoint: String,
    api_key: Option<String>,
    sender: String,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: Option<String>, sender: String) -> Self {
        HttpMailer { endpoint, api_key, sender }
    }
}

impl Mailer for HttpMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        let mut request = client.post(&self.endpoint).json(&serde_json::json!({
            "from": self.sender,
            "to": [to],
            "subject": subject,
            "text": body,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send()?;
        if !resp.status().is_success() {
            return Err(MailError::Rejected { status: resp.status().as_u16() });
        }
        Ok(())
    }
}

/// Used when no relay is configured; the message only goes to the log.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        info!("No mail relay configured. Message for {} ({}):\n{}", to, subject, body);
        Ok(())
    }
}

/// Form fields of a subscription request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub stipend: String,
}

impl SubscriptionRequest {
    pub fn validated_email(&self) -> Result<&str, SubscriptionError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(SubscriptionError::MissingEmail);
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(SubscriptionError::InvalidEmail);
        }
        Ok(email)
    }

    pub fn message_body(&self) -> String {
        format!(
            "You're subscribed for alerts with:\nSearch: {}\nLocation: {}\nDuration: {}\nStipend: {}",
            self.search, self.location, self.duration, self.stipend
        )
    }
}

/// Validates the request and sends the confirmation. Nothing is stored.
pub fn subscribe(mailer: &dyn Mailer, request: &SubscriptionRequest) -> Result<(), SubscriptionError> {
    let email = request.validated_email()?;
    match mailer.send(email, SUBJECT, &request.message_body()) {
        Ok(()) => {
            info!("Subscription email sent to {}", email);
            Ok(())
        }
        Err(e) => {
            error!("Failed to send subscription email to {}: {}", email, e);
            Err(SubscriptionError::Delivery(e))
        }
    }
}
