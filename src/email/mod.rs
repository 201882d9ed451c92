//! Outbound email through Amazon SES

use async_trait::async_trait;
use aws_sdk_sesv2::Client;
use aws_sdk_sesv2::config::Region;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("failed to build email: {0}")]
    InvalidMessage(String),

    #[error("email send failed: {0}")]
    SendFailed(String),
}

/// A plain-text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub source: String,
    pub destination: String,
    pub subject: String,
    pub text: String,
}

/// Email collaborator used by the notification-request handler
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// SES v2 backed sender
#[derive(Clone)]
pub struct SesEmailSender {
    client: Client,
}

impl SesEmailSender {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a sender from the default AWS credential chain, pinned to `region`
    pub async fn from_region(region: impl Into<String>) -> Self {
        let region = Region::new(region.into());
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region)
            .load()
            .await;
        info!(region = ?sdk_config.region(), "SES client configured");
        Self::new(Client::new(&sdk_config))
    }
}

/// SES v2 request fields for one email
#[derive(Debug, Clone)]
struct SesMessage {
    from: String,
    destination: Destination,
    content: EmailContent,
}

fn ses_message(email: &OutgoingEmail) -> Result<SesMessage, EmailError> {
    let subject = Content::builder()
        .data(&email.subject)
        .build()
        .map_err(|e| EmailError::InvalidMessage(e.to_string()))?;
    let text = Content::builder()
        .data(&email.text)
        .build()
        .map_err(|e| EmailError::InvalidMessage(e.to_string()))?;

    let message = Message::builder()
        .subject(subject)
        .body(Body::builder().text(text).build())
        .build();

    Ok(SesMessage {
        from: email.source.clone(),
        destination: Destination::builder()
            .to_addresses(&email.destination)
            .build(),
        content: EmailContent::builder().simple(message).build(),
    })
}

#[async_trait]
impl EmailSender for SesEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let message = ses_message(email)?;

        let output = self
            .client
            .send_email()
            .from_email_address(message.from)
            .destination(message.destination)
            .content(message.content)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        debug!(message_id = ?output.message_id(), "Email accepted by SES");
        Ok(())
    }
}

/// Sender that logs and keeps emails instead of delivering them.
///
/// Backs `--dry-run` and the tests.
#[derive(Debug, Default)]
pub struct RecordingEmailSender {
    sent: std::sync::Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender that rejects every email
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::SendFailed("recording sender set to fail".to_string()));
        }

        info!(subject = %email.subject, "Dry run: email not delivered");
        debug!(to = %email.destination, "Dry run recipient");

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(())
    }
}
