//! Conversation entity and in-memory conversation store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rules;
use super::{ChatError, Message, Sender};

/// Greetings a freshly created conversation opens with.
pub const GREETINGS: [&str; 5] = [
    "Hi there! How can I help you today?",
    "Hello! What can I do for you?",
    "Welcome! An agent is here to assist you.",
    "Hey! Thanks for reaching out. What do you need?",
    "Hello! Ask me anything.",
];

/// Stub agent handles are drawn from `1..=MAX_AGENT_ID`.
const MAX_AGENT_ID: u8 = 10;

/// A single chat session between a user and a support agent.
///
/// Messages are append-only in practice; insertion order is chronological
/// order. The alternation rule in [`rules`] is enforced at the boundary of
/// each mutating store operation, not continuously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier, generated at creation and never reused.
    pub conversation_id: Uuid,
    /// Handle to the assigned agent. Stubbed: a random value in `1..=10`.
    pub agent_id: u8,
    /// Ordered message history.
    pub messages: Vec<Message>,
    /// Creation time, set once.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent mutation.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation.
    #[must_use]
    pub fn new(conversation_id: Uuid, agent_id: u8, created_at: DateTime<Utc>) -> Self {
        Self {
            conversation_id,
            agent_id,
            messages: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }

    /// Append a message and advance `updated_at` to its timestamp.
    pub fn push(&mut self, message: Message) {
        self.updated_at = message.timestamp;
        self.messages.push(message);
    }

    /// The most recently appended message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Thread-safe registry of all conversations, keyed by generated UUID.
///
/// The store exclusively owns the stored [`Conversation`] values; callers
/// get clones. Mutating operations run their whole tentative-append /
/// validate / commit-or-rollback sequence under the write lock, so a
/// transient invalid state is never observable by other callers.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    conversations: RwLock<HashMap<Uuid, Conversation>>,
    /// Source for agent ids, greetings, and identifier bytes. Injectable
    /// so tests can seed it.
    rng: Mutex<StdRng>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Create an empty store with an entropy-seeded random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty store with the given random source.
    #[must_use]
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                conversations: RwLock::new(HashMap::new()),
                rng: Mutex::new(rng),
            }),
        }
    }

    /// Create a new conversation seeded with an agent greeting.
    ///
    /// Generates a fresh identifier (regenerating on the off chance of a
    /// collision), assigns a stub agent id, and appends one welcome
    /// message chosen uniformly from [`GREETINGS`].
    #[must_use]
    pub fn create(&self) -> Conversation {
        let mut rng = self.inner.rng.lock().unwrap();
        let mut conversations = self.inner.conversations.write().unwrap();

        let mut id = random_uuid(&mut rng);
        while conversations.contains_key(&id) {
            id = random_uuid(&mut rng);
        }

        let agent_id = rng.gen_range(1..=MAX_AGENT_ID);
        let now = Utc::now();

        let mut conversation = Conversation::new(id, agent_id, now);
        let greeting = *GREETINGS.choose(&mut *rng).unwrap_or(&GREETINGS[0]);
        conversation.push(Message {
            sender: Sender::Agent,
            content: greeting.to_string(),
            timestamp: now,
        });

        conversations.insert(id, conversation.clone());
        conversation
    }

    /// Get a conversation by id.
    pub fn get(&self, id: Uuid) -> Result<Conversation, ChatError> {
        let guard = self.inner.conversations.read().unwrap();
        guard.get(&id).cloned().ok_or(ChatError::NotFound)
    }

    /// All stored conversations. Ordering is not guaranteed.
    #[must_use]
    pub fn list(&self) -> HashMap<Uuid, Conversation> {
        self.inner.conversations.read().unwrap().clone()
    }

    /// Insert or replace the entry for `id` unconditionally.
    pub fn put(&self, id: Uuid, conversation: Conversation) {
        let mut guard = self.inner.conversations.write().unwrap();
        guard.insert(id, conversation);
    }

    /// Remove all conversations. Irreversible.
    pub fn clear(&self) {
        let mut guard = self.inner.conversations.write().unwrap();
        guard.clear();
    }

    /// Number of stored conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.conversations.read().unwrap().len()
    }

    /// Check if the store holds no conversations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Commit a user turn: the caller submits the full conversation with
    /// the new user message already appended (or a fresh conversation).
    ///
    /// The submitted payload is validated as-is; on violation the stored
    /// state is left untouched and the payload is discarded. On success
    /// the conversation overwrites the stored entry and is returned.
    pub fn submit_user_turn(&self, conversation: Conversation) -> Result<Conversation, ChatError> {
        if let Some(last) = conversation.last_message()
            && !Message::content_within_bounds(&last.content)
        {
            return Err(ChatError::InvalidContent);
        }
        if !rules::is_valid(&conversation) {
            return Err(ChatError::InvalidTurnOrder);
        }

        self.put(conversation.conversation_id, conversation.clone());
        Ok(conversation)
    }

    /// Commit an agent reply to an existing conversation.
    ///
    /// Two-phase: the message is tentatively appended in place, the
    /// alternation rule is checked, and on violation the append is rolled
    /// back (message popped, `updated_at` restored). Returns the reply
    /// content as acknowledgment.
    pub fn submit_agent_reply(&self, id: Uuid, message: Message) -> Result<String, ChatError> {
        if message.sender != Sender::Agent {
            return Err(ChatError::InvalidSender);
        }
        if !Message::content_within_bounds(&message.content) {
            return Err(ChatError::InvalidContent);
        }

        let mut guard = self.inner.conversations.write().unwrap();
        let conversation = guard.get_mut(&id).ok_or(ChatError::NotFound)?;

        let previous_updated_at = conversation.updated_at;
        let reply = message.content.clone();
        conversation.push(message);

        if !rules::is_valid(conversation) {
            conversation.messages.pop();
            conversation.updated_at = previous_updated_at;
            return Err(ChatError::InvalidTurnOrder);
        }

        Ok(reply)
    }
}

/// Draw a v4 identifier from the injected random source rather than the
/// global one, so seeded stores produce deterministic ids.
fn random_uuid(rng: &mut StdRng) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}
