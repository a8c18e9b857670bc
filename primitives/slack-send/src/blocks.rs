//! Block Kit payload builder.
//!
//! Not used by the CLI; kept for callers that want a rich-text payload to post
//! through a webhook or another client.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::SendError;

#[derive(Debug, Serialize)]
struct TextObject<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> TextObject<'a> {
    fn mrkdwn(text: &'a str) -> Self {
        Self {
            kind: "mrkdwn",
            text,
        }
    }
}

#[derive(Debug, Serialize)]
struct SectionBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<TextObject<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<TextObject<'a>>,
}

#[derive(Debug, Serialize)]
struct BlockMessage<'a> {
    blocks: Vec<SectionBlock<'a>>,
}

/// Serializes a header section and a body section, each skipped when empty,
/// as 4-space indented JSON.
///
/// # Errors
///
/// Returns [`SendError::Serialize`] if encoding fails.
pub fn build_block_payload(header: &str, text: &str) -> Result<Vec<u8>, SendError> {
    let mut blocks = Vec::with_capacity(2);
    if !header.is_empty() {
        blocks.push(SectionBlock {
            kind: "section",
            text: Some(TextObject::mrkdwn(header)),
            fields: Vec::new(),
        });
    }
    if !text.is_empty() {
        blocks.push(SectionBlock {
            kind: "section",
            text: None,
            fields: vec![TextObject::mrkdwn(text)],
        });
    }

    let mut body = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(b"    "));
    BlockMessage { blocks }.serialize(&mut ser)?;
    Ok(body)
}
