//! Notification requests: secrets, confirmation links and the email that
//! carries them.
//!
//! A subscriber asks to be notified about new episodes matching a query. The
//! request stays pending until the subscriber opens the link mailed to them,
//! which proves they own the address.

mod link;
mod token;

pub use link::{CONFIRMATION_PATH, confirmation_link, strip_confirmation_marker};
pub use token::{FixedTokenGenerator, RandomTokenGenerator, TOKEN_BYTES, TokenGenerator};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::email::OutgoingEmail;

/// A pending or confirmed request for notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub email: String,
    pub query: String,
    pub secret: String,
    pub created_at: DateTime<Utc>,
}

impl NotificationRequest {
    pub fn new(
        email: impl Into<String>,
        query: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            query: query.into(),
            secret: secret.into(),
            created_at: Utc::now(),
        }
    }
}

/// Compose the confirmation email for `request`
pub fn confirmation_email(
    sender: &str,
    request: &NotificationRequest,
    link: &str,
) -> OutgoingEmail {
    OutgoingEmail {
        source: sender.to_string(),
        destination: request.email.clone(),
        subject: format!("Confirm request for notifications: {}", request.query),
        text: format!("Visit this link to confirm request: {}", link),
    }
}
