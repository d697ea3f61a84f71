//! The turn-alternation rule.

use super::Conversation;

/// Check that the most recent mutation kept the conversation alternating.
///
/// A valid conversation is a series of alternating user and agent messages.
/// An empty history is valid. Only the final adjacent pair is compared:
/// the rule is applied after every single append, so the local check is
/// equivalent to a full-sequence scan as long as every mutation path goes
/// through it.
#[must_use]
pub fn is_valid(conversation: &Conversation) -> bool {
    let messages = &conversation.messages;
    match messages.len() {
        0 | 1 => true,
        n => messages[n - 1].sender != messages[n - 2].sender,
    }
}
