//! Chat message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChatError;

/// Upper bound on message content length, in characters.
pub const MAX_CONTENT_CHARS: usize = 200;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human on the customer side of the conversation.
    User,
    /// The support agent.
    Agent,
}

/// A single turn in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who authored the message.
    pub sender: Sender,
    /// Message text, 1 to [`MAX_CONTENT_CHARS`] characters.
    pub content: String,
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message, rejecting out-of-bounds content.
    pub fn new(
        sender: Sender,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ChatError> {
        let content = content.into();
        if !Self::content_within_bounds(&content) {
            return Err(ChatError::InvalidContent);
        }
        Ok(Self {
            sender,
            content,
            timestamp,
        })
    }

    /// Whether `content` fits the 1..=[`MAX_CONTENT_CHARS`] character bound.
    ///
    /// Payloads deserialized straight from the wire bypass [`Message::new`],
    /// so the submission boundaries re-check with this.
    #[must_use]
    pub fn content_within_bounds(content: &str) -> bool {
        let chars = content.chars().count();
        (1..=MAX_CONTENT_CHARS).contains(&chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_bounds() {
        assert!(!Message::content_within_bounds(""));
        assert!(Message::content_within_bounds("a"));
        assert!(Message::content_within_bounds(&"a".repeat(MAX_CONTENT_CHARS)));
        assert!(!Message::content_within_bounds(
            &"a".repeat(MAX_CONTENT_CHARS + 1)
        ));
    }

    #[test]
    fn test_new_rejects_empty_content() {
        let err = Message::new(Sender::User, "", Utc::now()).unwrap_err();
        assert_eq!(err, ChatError::InvalidContent);
    }

    #[test]
    fn test_sender_wire_format() {
        let msg = Message::new(Sender::Agent, "hello", Utc::now()).unwrap();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "agent");

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back.sender, Sender::Agent);
    }

    #[test]
    fn test_multibyte_content_counts_chars_not_bytes() {
        // 200 two-byte characters is still within bounds.
        let content = "é".repeat(MAX_CONTENT_CHARS);
        assert!(Message::content_within_bounds(&content));
    }
}
