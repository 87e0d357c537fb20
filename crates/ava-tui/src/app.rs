//! Application state and update logic for the chat window.
//!
//! `App` owns the conversation store plus all transient UI state
//! (input, selection, menus, inline edit, notification banner). Network
//! operations are requested by pushing a [`PendingOp`]; the event loop
//! drains them, runs the REST calls, and feeds an [`OpOutcome`] back.
//! Handlers are synchronous so the whole interaction flow is unit
//! testable without a terminal or a backend.

use crate::event::Action;
use crate::widgets::TextInputState;
use ava_core::{ApiError, Conversation, Message, MessageId, SalesContext};

/// Ticks a notification banner stays visible (~3s at 4 Hz).
const NOTIFICATION_TTL: usize = 12;

/// Rough lines per message bubble, for scroll estimates. Rendering
/// clamps to the real content height.
const LINES_PER_MESSAGE: usize = 3;

/// The kind of network operation, for labeling outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Fetch,
    Send,
    Update,
    Delete,
}

impl OpKind {
    /// Human-readable label for banners.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fetch => "load the conversation",
            Self::Send => "send the message",
            Self::Update => "update the message",
            Self::Delete => "delete the message",
        }
    }
}

/// A network operation requested by the app, to be run by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    FetchHistory,
    Send { text: String, context: SalesContext },
    Update { id: MessageId, text: String },
    Delete { id: MessageId },
}

impl PendingOp {
    /// The kind of this operation.
    pub fn kind(&self) -> OpKind {
        match self {
            Self::FetchHistory => OpKind::Fetch,
            Self::Send { .. } => OpKind::Send,
            Self::Update { .. } => OpKind::Update,
            Self::Delete { .. } => OpKind::Delete,
        }
    }
}

/// Result of a completed network operation.
#[derive(Debug)]
pub struct OpOutcome {
    pub kind: OpKind,
    pub result: Result<Vec<Message>, ApiError>,
}

/// Modal overlay currently open, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    /// Edit/Delete menu for the selected message. `item` is the
    /// highlighted entry: 0 = Edit, 1 = Delete.
    MessageMenu { item: usize },
    /// Context selector. `item` indexes [`SalesContext::ALL`].
    ContextMenu { item: usize },
}

/// Menu entries of the message menu, in order.
pub const MESSAGE_MENU_ITEMS: [&str; 2] = ["Edit", "Delete"];

/// Inline edit state for a customer message.
#[derive(Debug)]
pub struct EditState {
    /// Id of the message being edited.
    pub id: MessageId,
    /// Text before editing, for the no-change short circuit.
    pub original: String,
    /// The edit box, seeded with the original text.
    pub input: TextInputState,
}

/// Application state.
#[derive(Debug, Default)]
pub struct App {
    /// Conversation store (messages, loading, context).
    pub conversation: Conversation,

    /// Message input bar state.
    pub input: TextInputState,

    /// Inline edit, if a message is being edited.
    pub edit: Option<EditState>,

    /// Open overlay menu, if any.
    pub overlay: Overlay,

    /// Index of the selected message (customer messages only).
    pub selected: Option<usize>,

    /// Scroll offset in lines from the bottom (0 = follow newest).
    pub scroll_from_bottom: usize,

    /// Notification banner (displayed temporarily or until dismissed).
    pub notification: Option<String>,

    /// Ticks remaining until the notification is cleared.
    notification_ttl: usize,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Tick counter for animations.
    pub tick: usize,

    /// Operations requested but not yet picked up by the event loop.
    requested_ops: Vec<PendingOp>,
}

impl App {
    /// Create the app and request the initial history fetch.
    pub fn new() -> Self {
        let mut app = Self {
            conversation: Conversation::new(),
            ..Self::default()
        };
        app.conversation.begin_fetch();
        app.requested_ops.push(PendingOp::FetchHistory);
        app
    }

    /// Drain the operations requested since the last call.
    pub fn take_requested_ops(&mut self) -> Vec<PendingOp> {
        std::mem::take(&mut self.requested_ops)
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Select => self.confirm(),
            Action::Back => self.dismiss(),
            Action::Up => self.move_up(),
            Action::Down => self.move_down(),
            Action::ContextMenu => self.open_context_menu(),
            Action::None => {}
        }
    }

    /// Feed the result of a completed operation back into the store.
    pub fn apply_outcome(&mut self, outcome: OpOutcome) {
        match outcome.result {
            Ok(messages) => {
                self.conversation.commit(messages);
                self.scroll_from_bottom = 0;
                self.clamp_selection();
            }
            Err(err) => self.fail_operation(outcome.kind, &err.to_string()),
        }
    }

    /// Resolve an operation whose task ended without producing an
    /// outcome (panicked or was cancelled). The store must still be
    /// released, or the loading flag would stay set forever.
    pub fn apply_task_failure(&mut self, kind: OpKind) {
        self.fail_operation(kind, "the request was interrupted");
    }

    fn fail_operation(&mut self, kind: OpKind, detail: &str) {
        self.conversation.abort();
        self.set_notification(format!("Failed to {}: {detail}", kind.label()));
        self.scroll_from_bottom = 0;
        self.clamp_selection();
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// Whether the input bar currently has focus.
    pub fn input_focused(&self) -> bool {
        self.edit.is_none() && self.overlay == Overlay::None && self.selected.is_none()
    }

    // === Confirm (Enter) ===

    fn confirm(&mut self) {
        match self.overlay {
            Overlay::MessageMenu { item } => {
                self.overlay = Overlay::None;
                match item {
                    0 => self.start_edit(),
                    _ => self.request_delete(),
                }
            }
            Overlay::ContextMenu { item } => {
                self.overlay = Overlay::None;
                if let Some(ctx) = SalesContext::ALL.get(item) {
                    self.conversation.set_context(*ctx);
                }
            }
            Overlay::None => {
                if self.edit.is_some() {
                    self.confirm_edit();
                } else if self.selected.is_some() {
                    self.overlay = Overlay::MessageMenu { item: 0 };
                } else {
                    self.send();
                }
            }
        }
    }

    /// Send the input bar contents, if non-blank.
    ///
    /// Whitespace-only input performs no network call and no state
    /// change; the input keeps its contents.
    fn send(&mut self) {
        let text = self.input.content().trim().to_string();
        if text.is_empty() {
            return;
        }
        self.input.take();

        self.conversation.begin_send(&text);
        self.requested_ops.push(PendingOp::Send {
            text,
            context: self.conversation.context(),
        });
        self.scroll_from_bottom = 0;
    }

    /// Enter edit mode on the selected message.
    fn start_edit(&mut self) {
        let Some(msg) = self.selected_message() else {
            return;
        };
        self.edit = Some(EditState {
            id: msg.id,
            original: msg.text.clone(),
            input: TextInputState::seeded(msg.text.clone()),
        });
    }

    /// Confirm the inline edit. Only a changed, non-blank text triggers
    /// the update call; otherwise this is a no-op transition back to
    /// display.
    fn confirm_edit(&mut self) {
        let Some(edit) = self.edit.take() else {
            return;
        };
        let text = edit.input.content().trim().to_string();
        if text.is_empty() || text == edit.original {
            return;
        }

        self.conversation.begin_update(edit.id, &text);
        self.requested_ops.push(PendingOp::Update { id: edit.id, text });
        self.selected = None;
        self.scroll_from_bottom = 0;
    }

    /// Request deletion of the selected message. No confirmation step.
    fn request_delete(&mut self) {
        let Some(msg) = self.selected_message() else {
            return;
        };
        let id = msg.id;

        self.conversation.begin_delete();
        self.requested_ops.push(PendingOp::Delete { id });
        self.selected = None;
    }

    // === Dismiss (Esc) ===

    fn dismiss(&mut self) {
        if self.overlay != Overlay::None {
            self.overlay = Overlay::None;
        } else if self.edit.is_some() {
            // Discard: no mutation
            self.edit = None;
        } else if self.notification.is_some() {
            self.notification = None;
            self.notification_ttl = 0;
        } else if self.selected.is_some() {
            self.selected = None;
            self.scroll_from_bottom = 0;
        }
    }

    // === Selection and scrolling ===

    fn move_up(&mut self) {
        match &mut self.overlay {
            Overlay::MessageMenu { item } | Overlay::ContextMenu { item } => {
                *item = item.saturating_sub(1);
                return;
            }
            Overlay::None => {}
        }
        if self.edit.is_some() {
            return;
        }

        let candidates = self.customer_indices();
        if candidates.is_empty() {
            self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(1);
            return;
        }

        let next = match self.selected {
            None => candidates.last().copied(),
            Some(current) => candidates.iter().rev().find(|&&i| i < current).copied(),
        };
        if let Some(idx) = next {
            self.select(idx);
        }
    }

    fn move_down(&mut self) {
        match &mut self.overlay {
            Overlay::MessageMenu { item } => {
                *item = (*item + 1).min(MESSAGE_MENU_ITEMS.len() - 1);
                return;
            }
            Overlay::ContextMenu { item } => {
                *item = (*item + 1).min(SalesContext::ALL.len() - 1);
                return;
            }
            Overlay::None => {}
        }
        if self.edit.is_some() {
            return;
        }

        match self.selected {
            None => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(1);
            }
            Some(current) => {
                let candidates = self.customer_indices();
                match candidates.iter().find(|&&i| i > current) {
                    Some(&idx) => self.select(idx),
                    None => {
                        // Past the newest customer message: back to the input
                        self.selected = None;
                        self.scroll_from_bottom = 0;
                    }
                }
            }
        }
    }

    fn open_context_menu(&mut self) {
        if self.edit.is_some() {
            return;
        }
        let current = SalesContext::ALL
            .iter()
            .position(|&c| c == self.conversation.context())
            .unwrap_or(0);
        self.overlay = Overlay::ContextMenu { item: current };
    }

    fn select(&mut self, idx: usize) {
        self.selected = Some(idx);
        // Keep the selection roughly in view; rendering clamps
        let below = self.conversation.messages().len().saturating_sub(idx + 1);
        self.scroll_from_bottom = below * LINES_PER_MESSAGE;
    }

    /// Indices of messages the selection cursor can land on.
    fn customer_indices(&self) -> Vec<usize> {
        self.conversation
            .messages()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_from_customer())
            .map(|(i, _)| i)
            .collect()
    }

    /// The currently selected message, if the index is still valid.
    pub fn selected_message(&self) -> Option<&Message> {
        self.selected
            .and_then(|idx| self.conversation.messages().get(idx))
    }

    /// Drop the selection if the committed list invalidated it.
    fn clamp_selection(&mut self) {
        let still_valid = self
            .selected_message()
            .is_some_and(Message::is_from_customer);
        if !still_valid {
            self.selected = None;
        }
    }

    /// Set a temporary notification message.
    fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        self.notification_ttl = NOTIFICATION_TTL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ava_core::{ASSISTANT_ID, CUSTOMER_ID};

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

    /// App with the initial fetch already resolved.
    fn loaded_app() -> App {
        let mut app = App::new();
        let _ = app.take_requested_ops();
        app.apply_outcome(OpOutcome {
            kind: OpKind::Fetch,
            result: Ok(server_list()),
        });
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.input.insert(ch);
        }
    }

    #[test]
    fn test_new_requests_history_fetch() {
        let mut app = App::new();
        assert!(app.conversation.is_loading());
        assert_eq!(app.take_requested_ops(), vec![PendingOp::FetchHistory]);
        // Seeded greeting keeps the window from being blank
        assert_eq!(app.conversation.messages().len(), 1);
    }

    #[test]
    fn test_fetch_failure_surfaces_banner_and_clears_loading() {
        let mut app = App::new();
        let _ = app.take_requested_ops();
        app.apply_outcome(OpOutcome {
            kind: OpKind::Fetch,
            result: Err(ApiError::PendingId),
        });
        assert!(!app.conversation.is_loading());
        assert!(app.notification.is_some());
    }

    #[test]
    fn test_blank_send_is_a_no_op() {
        let mut app = loaded_app();
        type_text(&mut app, "   ");
        let before = app.conversation.messages().to_vec();

        app.handle_action(Action::Select);
        assert!(app.take_requested_ops().is_empty());
        assert_eq!(app.conversation.messages(), before.as_slice());
        assert!(!app.conversation.is_loading());
    }

    #[test]
    fn test_send_appends_pending_and_adopts_server_list() {
        let mut app = loaded_app();
        type_text(&mut app, "Hi");
        app.handle_action(Action::Select);

        assert!(app.input.is_empty());
        assert!(app.conversation.is_loading());
        let last = app.conversation.messages().last().unwrap();
        assert!(last.id.is_pending());
        assert_eq!(last.text, "Hi");

        let ops = app.take_requested_ops();
        assert_eq!(
            ops,
            vec![PendingOp::Send {
                text: "Hi".to_string(),
                context: SalesContext::Onboarding,
            }]
        );

        app.apply_outcome(OpOutcome {
            kind: OpKind::Send,
            result: Ok(server_list()),
        });
        assert_eq!(app.conversation.messages(), server_list().as_slice());
        assert!(!app.conversation.is_loading());
    }

    #[test]
    fn test_selection_skips_assistant_messages() {
        let mut app = loaded_app();
        app.handle_action(Action::Up);
        // Only index 1 is a customer message
        assert_eq!(app.selected, Some(1));

        app.handle_action(Action::Up);
        assert_eq!(app.selected, Some(1));

        app.handle_action(Action::Down);
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_menu_edit_with_identical_text_is_a_no_op() {
        let mut app = loaded_app();
        app.handle_action(Action::Up);
        app.handle_action(Action::Select); // open menu
        assert_eq!(app.overlay, Overlay::MessageMenu { item: 0 });

        app.handle_action(Action::Select); // choose Edit
        assert!(app.edit.is_some());

        app.handle_action(Action::Select); // confirm unchanged text
        assert!(app.edit.is_none());
        assert!(app.take_requested_ops().is_empty());
        assert_eq!(app.conversation.messages(), server_list().as_slice());
    }

    #[test]
    fn test_menu_edit_with_new_text_requests_update() {
        let mut app = loaded_app();
        app.handle_action(Action::Up);
        app.handle_action(Action::Select);
        app.handle_action(Action::Select); // Edit

        {
            let edit = app.edit.as_mut().unwrap();
            edit.input.take();
            for ch in "Hello v2".chars() {
                edit.input.insert(ch);
            }
        }
        app.handle_action(Action::Select);

        let ops = app.take_requested_ops();
        assert_eq!(
            ops,
            vec![PendingOp::Update {
                id: MessageId::Confirmed(2),
                text: "Hello v2".to_string(),
            }]
        );
        // Optimistic truncate-and-replace
        let last = app.conversation.messages().last().unwrap();
        assert!(last.id.is_pending());
        assert_eq!(last.text, "Hello v2");

        app.apply_outcome(OpOutcome {
            kind: OpKind::Update,
            result: Ok(server_list()),
        });
        assert_eq!(app.conversation.messages(), server_list().as_slice());
    }

    #[test]
    fn test_edit_discard_leaves_message_untouched() {
        let mut app = loaded_app();
        app.handle_action(Action::Up);
        app.handle_action(Action::Select);
        app.handle_action(Action::Select); // Edit
        {
            let edit = app.edit.as_mut().unwrap();
            edit.input.insert('!');
        }
        app.handle_action(Action::Back); // discard

        assert!(app.edit.is_none());
        assert!(app.take_requested_ops().is_empty());
        assert_eq!(app.conversation.messages(), server_list().as_slice());
    }

    #[test]
    fn test_menu_delete_requests_delete_and_adopts_list() {
        let mut app = loaded_app();
        app.handle_action(Action::Up);
        app.handle_action(Action::Select); // open menu
        app.handle_action(Action::Down); // highlight Delete
        app.handle_action(Action::Select);

        assert_eq!(
            app.take_requested_ops(),
            vec![PendingOp::Delete {
                id: MessageId::Confirmed(2)
            }]
        );
        assert!(app.conversation.is_loading());

        let after = vec![
            confirmed(1, ASSISTANT_ID, "How can I help you today?"),
            confirmed(3, ASSISTANT_ID, "Hello there!"),
        ];
        app.apply_outcome(OpOutcome {
            kind: OpKind::Delete,
            result: Ok(after.clone()),
        });
        assert_eq!(app.conversation.messages(), after.as_slice());
    }

    #[test]
    fn test_delete_failure_leaves_state_and_raises_banner() {
        let mut app = loaded_app();
        app.handle_action(Action::Up);
        app.handle_action(Action::Select);
        app.handle_action(Action::Down);
        app.handle_action(Action::Select);
        let _ = app.take_requested_ops();

        app.apply_outcome(OpOutcome {
            kind: OpKind::Delete,
            result: Err(ApiError::PendingId),
        });
        assert_eq!(app.conversation.messages(), server_list().as_slice());
        assert!(!app.conversation.is_loading());
        assert!(app.notification.is_some());
    }

    #[test]
    fn test_context_selection_affects_subsequent_sends_only() {
        let mut app = loaded_app();
        app.handle_action(Action::ContextMenu);
        assert_eq!(app.overlay, Overlay::ContextMenu { item: 0 });

        app.handle_action(Action::Down);
        app.handle_action(Action::Down);
        app.handle_action(Action::Select);
        assert_eq!(app.conversation.context(), SalesContext::Negotiation);
        // No fetch, no state change
        assert!(app.take_requested_ops().is_empty());
        assert_eq!(app.conversation.messages(), server_list().as_slice());

        type_text(&mut app, "Deal?");
        app.handle_action(Action::Select);
        assert_eq!(
            app.take_requested_ops(),
            vec![PendingOp::Send {
                text: "Deal?".to_string(),
                context: SalesContext::Negotiation,
            }]
        );
    }

    #[test]
    fn test_interrupted_task_releases_loading_and_rolls_back() {
        let mut app = loaded_app();
        type_text(&mut app, "Hi");
        app.handle_action(Action::Select);
        let _ = app.take_requested_ops();
        assert!(app.conversation.is_loading());

        app.apply_task_failure(OpKind::Send);
        assert!(!app.conversation.is_loading());
        assert!(app.notification.is_some());
        assert_eq!(app.conversation.messages(), server_list().as_slice());
    }

    #[test]
    fn test_notification_expires_after_ttl() {
        let mut app = loaded_app();
        app.apply_outcome(OpOutcome {
            kind: OpKind::Send,
            result: Err(ApiError::PendingId),
        });
        assert!(app.notification.is_some());

        for _ in 0..NOTIFICATION_TTL {
            app.tick();
        }
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_esc_dismisses_banner() {
        let mut app = loaded_app();
        app.apply_outcome(OpOutcome {
            kind: OpKind::Send,
            result: Err(ApiError::PendingId),
        });
        app.handle_action(Action::Back);
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_input_focus_follows_modal_state() {
        let mut app = loaded_app();
        assert!(app.input_focused());

        app.handle_action(Action::Up);
        assert!(!app.input_focused());

        app.handle_action(Action::Back);
        assert!(app.input_focused());

        app.handle_action(Action::ContextMenu);
        assert!(!app.input_focused());
    }
}
