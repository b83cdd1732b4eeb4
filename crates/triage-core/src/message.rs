//! Transcript messages.
//!
//! A [`Transcript`] is append-only: messages keep their insertion order, are
//! never edited, and are only removed all at once by [`Transcript::clear`].

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Sender;
use crate::render::ReplyView;

/// Content of a message: plain text or a rendered bot reply.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum MessageBody {
    Text(String),
    Reply(ReplyView),
}

impl MessageBody {
    /// Plain-text rendition of the body.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Reply(view) => view.to_plain_text(),
        }
    }
}

impl From<String> for MessageBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<ReplyView> for MessageBody {
    fn from(view: ReplyView) -> Self {
        Self::Reply(view)
    }
}

/// A single transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub body: MessageBody,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    #[must_use]
    pub fn new(body: impl Into<MessageBody>, sender: Sender) -> Self {
        let timestamp = Utc::now();
        Self {
            id: message_id(timestamp),
            body: body.into(),
            sender,
            timestamp,
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.body.to_plain_text()
    }
}

/// Generate `msg-<unix millis>-<8 hex chars>`.
///
/// The suffix comes from the OS RNG. If the RNG is unavailable the
/// sub-second nanoseconds are used instead; ids only need to be distinct
/// within one session.
fn message_id(timestamp: DateTime<Utc>) -> String {
    let mut suffix = [0u8; 4];
    if getrandom::fill(&mut suffix).is_err() {
        suffix = timestamp.timestamp_subsec_nanos().to_le_bytes();
    }
    let hex: String = suffix.iter().map(|b| format!("{b:02x}")).collect();
    format!("msg-{}-{hex}", timestamp.timestamp_millis())
}

/// Ordered, append-only sequence of messages for the current session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a message and append it. Returns the appended message.
    pub fn append(&mut self, body: impl Into<MessageBody>, sender: Sender) -> &Message {
        self.messages.push(Message::new(body, sender));
        let last = self.messages.len() - 1;
        &self.messages[last]
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages from `sender`.
    #[must_use]
    pub fn count_from(&self, sender: Sender) -> usize {
        self.messages.iter().filter(|m| m.sender == sender).count()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
