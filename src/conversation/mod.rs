//! Conversation storage and turn-order validation.
//!
//! This module provides the in-memory conversation registry plus the
//! chat-session rules the HTTP layer delegates to. Conversations are
//! identified by UUID and hold the full message history.
//!
//! # Architecture
//!
//! - [`Conversation`]: A single chat session between a user and an agent
//! - [`ConversationStore`]: Thread-safe store for all conversations
//! - [`rules`]: The turn-alternation rule applied after every mutation
//!
//! # Example
//!
//! ```rust
//! use parley::conversation::ConversationStore;
//!
//! let store = ConversationStore::new();
//! let conversation = store.create();
//!
//! // Every new conversation opens with an agent greeting.
//! assert_eq!(conversation.messages.len(), 1);
//! ```

mod message;
pub mod rules;
mod store;

pub use message::{MAX_CONTENT_CHARS, Message, Sender};
pub use store::{Conversation, ConversationStore, GREETINGS};

/// Errors surfaced by the conversation operations.
///
/// All variants are recoverable by the caller; the store is left in a
/// consistent state after every failure path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// No conversation exists for the given identifier.
    #[error("Conversation not found")]
    NotFound,

    /// An agent reply was submitted with a non-agent sender.
    #[error("Invalid sender")]
    InvalidSender,

    /// The mutation would place two consecutive messages from the same sender.
    #[error("Cannot send two messages back to back. Please wait for a response.")]
    InvalidTurnOrder,

    /// Message content is empty or longer than [`MAX_CONTENT_CHARS`].
    #[error("Message content must be between 1 and 200 characters")]
    InvalidContent,
}
