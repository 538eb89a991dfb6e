//! Notification endpoints

use serde::{Deserialize, Serialize};

use crate::client::GnossClient;
use crate::error::Result;

/// An e-mail sent on behalf of a community
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mail {
    pub subject: String,
    pub body: String,
    pub receivers: Vec<String>,
    #[serde(default)]
    pub is_html: bool,
    /// Display name shown as sender
    #[serde(default)]
    pub sender_mask: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_short_name: Option<String>,
}

impl Mail {
    pub fn new(subject: impl Into<String>, body: impl Into<String>, receivers: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            receivers,
            is_html: false,
            sender_mask: String::new(),
            community_short_name: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationApi {
    client: GnossClient,
}

impl NotificationApi {
    pub(crate) fn new(client: GnossClient) -> Self {
        Self { client }
    }

    pub fn send_mail(&self, mail: &Mail) -> Result<()> {
        self.client.post_unit("notification/send-mail", mail)?;
        tracing::debug!(receivers = mail.receivers.len(), subject = %mail.subject, "mail sent");
        Ok(())
    }
}
