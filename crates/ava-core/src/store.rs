//! Conversation store: the single owner of chat state.
//!
//! Holds the ordered message list, the loading flag, and the selected
//! context. Network calls happen elsewhere; callers drive the store
//! through begin/commit/abort transitions so that every in-flight
//! operation resolves the loading flag exactly once.
//!
//! Reconciliation policy: mutations splice an optimistic entry into the
//! list immediately, then the server's canonical list unconditionally
//! replaces local state on `commit`. On `abort` the pre-operation
//! snapshot is restored, so a failed call leaves prior state intact.

use crate::model::{Message, MessageId, SalesContext};

/// Conversation state owned by the store.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    context: SalesContext,
    loading: bool,
    /// Pre-operation snapshot for rollback on failure. At most one;
    /// a second `begin_*` before resolution overwrites it (racing
    /// mutations are last-write-wins, an accepted limitation).
    snapshot: Option<Vec<Message>>,
}

impl Conversation {
    /// Create a conversation seeded with the local assistant greeting,
    /// so the window is never blank before the first fetch lands.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::greeting()],
            ..Self::default()
        }
    }

    /// The current message list, in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a network call is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The context attached to subsequent sends.
    pub fn context(&self) -> SalesContext {
        self.context
    }

    /// Select the context for subsequent sends. Triggers no fetch.
    pub fn set_context(&mut self, context: SalesContext) {
        self.context = context;
    }

    /// Mark the initial history fetch as in flight.
    pub fn begin_fetch(&mut self) {
        self.snapshot = Some(self.messages.clone());
        self.loading = true;
    }

    /// Splice in an optimistic customer message ahead of a send.
    pub fn begin_send(&mut self, text: &str) {
        self.snapshot = Some(self.messages.clone());
        self.messages.push(Message::pending_from_customer(text));
        self.loading = true;
    }

    /// Locally apply an edit ahead of an update call.
    ///
    /// Mirrors the backend: everything from the edited message onward is
    /// discarded and a pending replacement takes its place. The server
    /// regenerates the assistant reply and `commit` brings it in.
    pub fn begin_update(&mut self, id: MessageId, new_text: &str) {
        self.snapshot = Some(self.messages.clone());
        if let Some(index) = self.messages.iter().position(|m| m.id == id) {
            self.messages.truncate(index);
        }
        self.messages.push(Message::pending_from_customer(new_text));
        self.loading = true;
    }

    /// Mark a delete as in flight. No local change until the server
    /// confirms; `commit` applies the returned list.
    pub fn begin_delete(&mut self) {
        self.snapshot = Some(self.messages.clone());
        self.loading = true;
    }

    /// Replace local state with the server's canonical list.
    pub fn commit(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.snapshot = None;
        self.loading = false;
    }

    /// Roll back to the pre-operation snapshot and release loading.
    pub fn abort(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.messages = snapshot;
        }
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ASSISTANT_ID, CUSTOMER_ID};

    fn confirmed(id: i64, sender_id: i64, text: &str) -> Message {
        Message {
            id: MessageId::Confirmed(id),
            sender_id,
            text: text.to_string(),
        }
    }

    fn server_list() -> Vec<Message> {
        vec![
            confirmed(1, ASSISTANT_ID, "How can I help you today?"),
            confirmed(2, CUSTOMER_ID, "Hi"),
            confirmed(3, ASSISTANT_ID, "Hello there!"),
        ]
    }

    #[test]
    fn test_new_seeds_greeting() {
        let conv = Conversation::new();
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].sender_id, ASSISTANT_ID);
        assert!(!conv.is_loading());
    }

    #[test]
    fn test_fetch_replaces_list() {
        let mut conv = Conversation::new();
        conv.begin_fetch();
        assert!(conv.is_loading());
        conv.commit(server_list());
        assert!(!conv.is_loading());
        assert_eq!(conv.messages().len(), 3);
    }

    #[test]
    fn test_send_splices_pending_then_commits_server_truth() {
        let mut conv = Conversation::new();
        conv.commit(vec![confirmed(1, ASSISTANT_ID, "How can I help you today?")]);

        conv.begin_send("Hi");
        assert!(conv.is_loading());
        let last = conv.messages().last().unwrap();
        assert!(last.id.is_pending());
        assert!(last.is_from_customer());
        assert_eq!(last.text, "Hi");

        conv.commit(server_list());
        assert_eq!(conv.messages(), server_list().as_slice());
        assert!(conv.messages().iter().all(|m| !m.id.is_pending()));
        assert!(!conv.is_loading());
    }

    #[test]
    fn test_send_abort_restores_prior_state() {
        let mut conv = Conversation::new();
        let before = vec![confirmed(1, ASSISTANT_ID, "How can I help you today?")];
        conv.commit(before.clone());

        conv.begin_send("Hi");
        conv.abort();
        assert_eq!(conv.messages(), before.as_slice());
        assert!(!conv.is_loading());
    }

    #[test]
    fn test_update_truncates_and_replaces() {
        let mut conv = Conversation::new();
        conv.commit(server_list());

        conv.begin_update(MessageId::Confirmed(2), "Hello v2");
        // Everything from the edited message onward is gone, replaced
        // by the pending edit.
        assert_eq!(conv.messages().len(), 2);
        assert_eq!(conv.messages()[0].id, MessageId::Confirmed(1));
        let last = conv.messages().last().unwrap();
        assert!(last.id.is_pending());
        assert_eq!(last.text, "Hello v2");
    }

    #[test]
    fn test_update_abort_restores_tail() {
        let mut conv = Conversation::new();
        conv.commit(server_list());

        conv.begin_update(MessageId::Confirmed(2), "Hello v2");
        conv.abort();
        assert_eq!(conv.messages(), server_list().as_slice());
    }

    #[test]
    fn test_delete_changes_nothing_until_commit() {
        let mut conv = Conversation::new();
        conv.commit(server_list());

        conv.begin_delete();
        assert!(conv.is_loading());
        assert_eq!(conv.messages(), server_list().as_slice());

        let after = vec![
            confirmed(1, ASSISTANT_ID, "How can I help you today?"),
            confirmed(3, ASSISTANT_ID, "Hello there!"),
        ];
        conv.commit(after.clone());
        assert_eq!(conv.messages(), after.as_slice());
        assert!(!conv.is_loading());
    }

    #[test]
    fn test_delete_abort_leaves_state_unchanged() {
        let mut conv = Conversation::new();
        conv.commit(server_list());

        conv.begin_delete();
        conv.abort();
        assert_eq!(conv.messages(), server_list().as_slice());
        assert!(!conv.is_loading());
    }

    #[test]
    fn test_set_context_touches_nothing_else() {
        let mut conv = Conversation::new();
        conv.commit(server_list());

        conv.set_context(SalesContext::Negotiation);
        assert_eq!(conv.context(), SalesContext::Negotiation);
        assert_eq!(conv.messages(), server_list().as_slice());
        assert!(!conv.is_loading());
    }

    #[test]
    fn test_abort_without_begin_is_harmless() {
        let mut conv = Conversation::new();
        let before = conv.messages().to_vec();
        conv.abort();
        assert_eq!(conv.messages(), before.as_slice());
    }
}
