//! Message value types and the `chat.postMessage` payload.

use serde::{Deserialize, Serialize};

/// A message to post: header as the primary text, body in an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub channel_id: String,
    pub header: String,
    pub text: String,
    pub color: Option<String>,
}

impl Message {
    #[must_use]
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Secondary formatted block attached to a posted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Attachment {
    /// Builds an attachment; an empty color means no color field.
    #[must_use]
    pub fn new(text: &str, color: Option<&str>) -> Self {
        Self {
            text: text.to_string(),
            color: color.filter(|c| !c.is_empty()).map(str::to_string),
        }
    }
}

/// JSON body for `chat.postMessage`.
#[derive(Debug, Serialize)]
pub(crate) struct PostMessageRequest<'a> {
    pub channel: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub as_user: bool,
}

/// Where and when Slack stored a posted message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}
