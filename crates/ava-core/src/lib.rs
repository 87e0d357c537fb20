//! ava-core: Headless conversation engine for the Ava chat client
//!
//! This crate provides the non-terminal half of the client, including:
//! - The conversation data model (messages, ids, contexts)
//! - The conversation store with optimistic-splice reconciliation
//! - The REST client for the chat backend
//! - Configuration loading and saving

pub mod api;
pub mod config;
pub mod model;
pub mod store;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, WireMessage};
pub use config::{Config, ConfigError};
pub use model::{Message, MessageId, SalesContext, ASSISTANT_ID, CUSTOMER_ID};
pub use store::Conversation;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
