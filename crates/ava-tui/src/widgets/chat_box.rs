//! Scrollable chat history widget.
//!
//! Renders one bubble per message, routed by sender: assistant replies
//! on the left with an avatar glyph, customer messages right-aligned.
//! While a request is in flight a typing indicator row is appended.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use ava_core::Message;
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;
use crate::widgets::TextInputState;

/// Avatar glyph shown next to assistant replies.
const AVATAR: &str = "◉";

/// Typing indicator frames, cycled per tick.
const TYPING_FRAMES: [&str; 3] = ["●∙∙", "●●∙", "●●●"];

/// Scrollable message history with bubbles per sender.
pub struct ChatBox<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    selected: Option<usize>,
    edit: Option<(usize, &'a TextInputState)>,
    loading: bool,
    scroll_from_bottom: usize,
    tick: usize,
}

impl<'a> ChatBox<'a> {
    /// Create a new chat box.
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            selected: None,
            edit: None,
            loading: false,
            scroll_from_bottom: 0,
            tick: 0,
        }
    }

    /// Highlight the message at the given index.
    #[must_use]
    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    /// Render an inline edit box in place of the message at `index`.
    #[must_use]
    pub fn editing(mut self, edit: Option<(usize, &'a TextInputState)>) -> Self {
        self.edit = edit;
        self
    }

    /// Show the typing indicator row.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Scroll offset in lines from the bottom (0 = follow newest).
    #[must_use]
    pub fn scroll_from_bottom(mut self, lines: usize) -> Self {
        self.scroll_from_bottom = lines;
        self
    }

    /// Tick counter driving the typing indicator animation.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    /// Build the inline edit box lines for the message being edited.
    fn build_edit_lines(&self, input: &TextInputState, width: usize) -> Vec<Line<'static>> {
        let style = Style::default().fg(self.theme.border_focused);
        let chars: Vec<char> = input.content().chars().collect();
        let cursor = input.cursor.min(chars.len());
        let before: String = chars[..cursor].iter().collect();
        let after: String = chars[cursor..].iter().collect();

        let mut spans = vec![
            Span::styled("✎ ".to_string(), style),
            Span::styled(before, Style::default().fg(self.theme.text)),
            Span::styled("█".to_string(), Style::default().fg(self.theme.text)),
            Span::styled(after, Style::default().fg(self.theme.text)),
        ];
        let hint = "  Enter save · Esc cancel";
        if chars.len() + 2 + hint.len() < width {
            spans.push(Span::styled(
                hint.to_string(),
                Style::default().fg(self.theme.muted),
            ));
        }
        vec![Line::from(spans)]
    }

    /// Build the wrapped lines for an assistant reply.
    fn build_assistant_lines(&self, text: &str, width: usize) -> Vec<Line<'static>> {
        let wrap_width = width.saturating_sub(2).max(10);
        let style = Style::default().fg(self.theme.text);
        let avatar_style = Style::default().fg(self.theme.assistant);

        let mut lines = Vec::new();
        for (i, wrapped) in textwrap::wrap(text, wrap_width).iter().enumerate() {
            let prefix = if i == 0 { format!("{AVATAR} ") } else { "  ".to_string() };
            lines.push(Line::from(vec![
                Span::styled(prefix, avatar_style),
                Span::styled(wrapped.to_string(), style),
            ]));
        }
        lines
    }

    /// Build the right-aligned lines for a customer message.
    fn build_customer_lines(
        &self,
        msg: &Message,
        selected: bool,
        width: usize,
    ) -> Vec<Line<'static>> {
        // Bubbles take at most two thirds of the pane
        let wrap_width = (width.saturating_mul(2) / 3).max(10);

        let mut style = Style::default().fg(self.theme.customer);
        if msg.id.is_pending() {
            style = Style::default().fg(self.theme.muted);
        }
        if selected {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let mut lines = Vec::new();
        for wrapped in textwrap::wrap(&msg.text, wrap_width) {
            let pad = width.saturating_sub(wrapped.width());
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(pad)),
                Span::styled(wrapped.to_string(), style),
            ]));
        }
        lines
    }

    /// Build the full transcript, one blank line between bubbles.
    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for (idx, msg) in self.messages.iter().enumerate() {
            if !lines.is_empty() {
                lines.push(Line::raw(""));
            }
            if let Some((edit_idx, input)) = self.edit {
                if edit_idx == idx {
                    lines.extend(self.build_edit_lines(input, width));
                    continue;
                }
            }
            if msg.is_from_customer() {
                let selected = self.selected == Some(idx);
                lines.extend(self.build_customer_lines(msg, selected, width));
            } else {
                lines.extend(self.build_assistant_lines(&msg.text, width));
            }
        }

        if self.loading {
            if !lines.is_empty() {
                lines.push(Line::raw(""));
            }
            let frame = TYPING_FRAMES[self.tick % TYPING_FRAMES.len()];
            lines.push(Line::from(Span::styled(
                format!("{AVATAR} {frame}"),
                Style::default().fg(self.theme.muted),
            )));
        }

        lines
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Widget for ChatBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines = self.build_lines(inner.width as usize);
        let height = inner.height as usize;

        // Bottom-anchored: skip everything above the visible window,
        // clamping the requested scroll to the available history
        let max_scroll = lines.len().saturating_sub(height);
        let scroll = self.scroll_from_bottom.min(max_scroll);
        let skip = max_scroll - scroll;

        let visible: Vec<Line<'static>> = lines.into_iter().skip(skip).take(height).collect();
        Paragraph::new(visible).render(inner, buf);
    }
}
