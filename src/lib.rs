//! Parley — a minimal chat-session backend.
//!
//! Exposes endpoints to create conversations, append alternating
//! user/agent messages, and retrieve or delete stored conversations.
//! State lives in process memory only.
//!
//! # Architecture
//!
//! - **Server**: Thin Axum layer delegating to the conversation store
//! - **Store**: In-memory conversation registry with generated ids and
//!   welcome-message seeding
//! - **Rules**: Strict sender alternation, enforced after every mutation
//!
//! # Modules
//!
//! - [`config`]: Layered application configuration
//! - [`conversation`]: Conversation store, entities, and turn rules
//! - [`server`]: HTTP routing and error mapping

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod conversation;
pub mod server;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::conversation::ConversationStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Conversation store for chat session management.
    pub store: ConversationStore,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}
