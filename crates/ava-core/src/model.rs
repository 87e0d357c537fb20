//! Conversation data model.
//!
//! Message ordering is whatever the server returns; the UI treats array
//! order as display order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed sender id for the human customer.
pub const CUSTOMER_ID: i64 = 23;

/// Fixed sender id for the AI assistant ("Ava").
pub const ASSISTANT_ID: i64 = 42;

/// Identifier for a message.
///
/// Locally created messages start as `Pending` until the server echoes
/// back the canonical list with real ids. Only `Confirmed` ids can be
/// addressed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Server-assigned identifier.
    Confirmed(i64),
    /// Locally created, not yet acknowledged by the server.
    Pending,
}

impl MessageId {
    /// The server-assigned id, if this message has one.
    pub fn confirmed(self) -> Option<i64> {
        match self {
            Self::Confirmed(id) => Some(id),
            Self::Pending => None,
        }
    }

    /// Whether this message is still awaiting server acknowledgement.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: i64,
    pub text: String,
}

impl Message {
    /// Create a pending customer message (optimistic local entry).
    pub fn pending_from_customer(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::Pending,
            sender_id: CUSTOMER_ID,
            text: text.into(),
        }
    }

    /// The local assistant greeting shown before the first fetch lands.
    pub fn greeting() -> Self {
        Self {
            id: MessageId::Confirmed(0),
            sender_id: ASSISTANT_ID,
            text: "Hello! I'm here to help.".to_string(),
        }
    }

    /// Whether this message was written by the customer.
    pub fn is_from_customer(&self) -> bool {
        self.sender_id == CUSTOMER_ID
    }
}

/// Conversational mode label sent with each outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SalesContext {
    #[default]
    Onboarding,
    Closing,
    Negotiation,
}

impl SalesContext {
    /// All selectable contexts, in menu order.
    pub const ALL: [Self; 3] = [Self::Onboarding, Self::Closing, Self::Negotiation];

    /// The wire representation of this context.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Onboarding => "Onboarding",
            Self::Closing => "Closing",
            Self::Negotiation => "Negotiation",
        }
    }
}

impl fmt::Display for SalesContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ctx| ctx.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown context '{s}' (expected Onboarding, Closing, or Negotiation)"))
    }
}
