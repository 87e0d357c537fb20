//! ava-tui: Terminal UI for the Ava chat client
//!
//! This crate provides the chat window: greeting header, scrollable
//! message history, input bar, context picker, and message actions
//! (edit/delete). Network calls run on background tasks so the UI
//! stays responsive while the assistant is thinking.

mod app;
mod event;
mod theme;
mod widgets;

pub use app::{App, EditState, OpKind, OpOutcome, Overlay, PendingOp, MESSAGE_MENU_ITEMS};
pub use event::{Action, Event, EventHandler};
pub use theme::Theme;
pub use widgets::{ChatBox, Footer, Header, InputBar, KeyHint, Menu, TextInputState};

use ava_core::{ApiClient, Config, SalesContext};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::Widget,
    Terminal,
};
use std::io::{self, stdout};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the chat TUI.
///
/// Sets up the terminal, runs the event loop against the configured
/// backend, and restores the terminal on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let client = ApiClient::new(config);
    let mut app = App::new();
    let theme = Theme::default();

    // 4 Hz tick rate drives the typing indicator and banner TTL
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &client, &theme, &mut events).await;

    terminal.show_cursor()?;
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ApiClient,
    theme: &Theme,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    // Kept alongside each handle so a join failure can still be
    // resolved against the store
    let mut op_handles: Vec<(OpKind, tokio::task::JoinHandle<OpOutcome>)> = Vec::new();

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();
            draw(app, theme, area, buf);
        })?;

        // Spawn any newly requested network operations
        for op in app.take_requested_ops() {
            let client = client.clone();
            let kind = op.kind();
            let handle = tokio::spawn(async move {
                let result = match op {
                    PendingOp::FetchHistory => client.fetch_history().await,
                    PendingOp::Send { text, context } => {
                        client.send_message(&text, context).await
                    }
                    PendingOp::Update { id, text } => client.update_message(id, &text).await,
                    PendingOp::Delete { id } => client.delete_message(id).await,
                };
                OpOutcome { kind, result }
            });
            op_handles.push((kind, handle));
        }

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if handle_chat_key(app, key) {
                        continue;
                    }
                    let action = event::key_to_action(key);
                    app.handle_action(action);
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::Up),
                        MouseEventKind::ScrollDown => app.handle_action(Action::Down),
                        _ => {}
                    }
                }
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {}
            }
        }

        // Check for completed operations (non-blocking)
        let mut completed = Vec::new();
        for (i, (_, handle)) in op_handles.iter().enumerate() {
            if handle.is_finished() {
                completed.push(i);
            }
        }
        for i in completed.into_iter().rev() {
            let (kind, handle) = op_handles.remove(i);
            match handle.await {
                Ok(outcome) => app.apply_outcome(outcome),
                // A panicked or cancelled task still has to release
                // the store
                Err(_) => app.apply_task_failure(kind),
            }
        }

        if app.should_quit {
            for (_, handle) in op_handles {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Draw the chat window.
fn draw(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    Header::new(theme).render(header_area, buf);

    let messages = app.conversation.messages();
    let edit = app
        .edit
        .as_ref()
        .and_then(|e| {
            messages
                .iter()
                .position(|m| m.id == e.id)
                .map(|idx| (idx, &e.input))
        });
    ChatBox::new(messages, theme)
        .selected(app.selected)
        .editing(edit)
        .loading(app.conversation.is_loading())
        .scroll_from_bottom(app.scroll_from_bottom)
        .tick(app.tick)
        .render(chat_area, buf);

    InputBar::new(&app.input, theme)
        .focused(app.input_focused())
        .loading(app.conversation.is_loading())
        .render(input_area, buf);

    Footer::new(theme, app.conversation.context())
        .hints(footer_hints(app))
        .notification(app.notification.as_deref())
        .render(footer_area, buf);

    match app.overlay {
        Overlay::MessageMenu { item } => {
            Menu::new("Message", &MESSAGE_MENU_ITEMS, theme)
                .selected(item)
                .render(chat_area, buf);
        }
        Overlay::ContextMenu { item } => {
            let items: Vec<&str> = SalesContext::ALL.iter().copied().map(SalesContext::as_str).collect();
            Menu::new("Context", &items, theme)
                .selected(item)
                .render(chat_area, buf);
        }
        Overlay::None => {}
    }
}

/// Key hints for the current mode.
fn footer_hints(app: &App) -> Vec<KeyHint> {
    if app.overlay != Overlay::None {
        vec![
            KeyHint { key: "↑↓", description: "choose" },
            KeyHint { key: "Enter", description: "confirm" },
            KeyHint { key: "Esc", description: "cancel" },
        ]
    } else if app.edit.is_some() {
        vec![
            KeyHint { key: "Enter", description: "save" },
            KeyHint { key: "Esc", description: "cancel" },
        ]
    } else if app.selected.is_some() {
        vec![
            KeyHint { key: "Enter", description: "actions" },
            KeyHint { key: "↑↓", description: "select" },
            KeyHint { key: "Esc", description: "back" },
        ]
    } else {
        vec![
            KeyHint { key: "Enter", description: "send" },
            KeyHint { key: "↑", description: "select message" },
            KeyHint { key: "Tab", description: "context" },
            KeyHint { key: "Ctrl+C", description: "quit" },
        ]
    }
}

/// Handle key input for text entry.
/// Returns true if the key was consumed (should not become an action).
fn handle_chat_key(app: &mut App, key: crossterm::event::KeyEvent) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};

    // Menus take no text input
    if app.overlay != Overlay::None {
        return false;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    let input = match &mut app.edit {
        Some(edit) => &mut edit.input,
        None => {
            if app.selected.is_some() {
                return false;
            }
            &mut app.input
        }
    };

    match key.code {
        KeyCode::Char(c) => {
            input.insert(c);
            true
        }
        KeyCode::Backspace => {
            input.backspace();
            true
        }
        KeyCode::Delete => {
            input.delete();
            true
        }
        KeyCode::Left => {
            input.move_left();
            true
        }
        KeyCode::Right => {
            input.move_right();
            true
        }
        KeyCode::Home => {
            input.move_home();
            true
        }
        KeyCode::End => {
            input.move_end();
            true
        }
        // Enter, Esc, Tab, Up, Down are actions
        _ => false,
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn buffer_content(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn draw_app(app: &App, width: u16, height: u16) -> String {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                let buf = frame.buffer_mut();
                draw(app, &theme, area, buf);
            })
            .unwrap();
        buffer_content(&terminal)
    }

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    #[test]
    fn test_typed_chars_reach_the_input_bar() {
        let mut app = App::new();
        assert!(handle_chat_key(&mut app, key(KeyCode::Char('H'))));
        assert!(handle_chat_key(&mut app, key(KeyCode::Char('i'))));
        assert_eq!(app.input.content(), "Hi");
    }

    #[test]
    fn test_enter_is_not_consumed_by_text_entry() {
        let mut app = App::new();
        assert!(!handle_chat_key(&mut app, key(KeyCode::Enter)));
        assert!(!handle_chat_key(&mut app, key(KeyCode::Esc)));
        assert!(!handle_chat_key(&mut app, key(KeyCode::Tab)));
    }

    #[test]
    fn test_menu_blocks_text_entry() {
        let mut app = App::new();
        app.overlay = Overlay::ContextMenu { item: 0 };
        assert!(!handle_chat_key(&mut app, key(KeyCode::Char('x'))));
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_draw_full_window() {
        let app = App::new();
        let content = draw_app(&app, 70, 20);
        assert!(content.contains("I'm Ava"));
        assert!(content.contains("Hello! I'm here to help."));
        assert!(content.contains("Context: Onboarding"));
    }

    #[test]
    fn test_draw_context_menu_overlay() {
        let mut app = App::new();
        app.overlay = Overlay::ContextMenu { item: 2 };
        let content = draw_app(&app, 70, 20);
        assert!(content.contains("Onboarding"));
        assert!(content.contains("▸ Negotiation"));
    }

    #[test]
    fn test_draw_tiny_terminal_does_not_panic() {
        let app = App::new();
        let _ = draw_app(&app, 10, 7);
    }
}
