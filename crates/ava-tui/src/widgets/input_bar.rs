//! Full-width input bar widget.
//!
//! Always visible at the bottom of the screen for composing messages.
//! Shows a waiting indicator while a request is in flight.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;
use crate::widgets::TextInputState;

/// Placeholder shown when the input is empty and unfocused.
const PLACEHOLDER: &str = "Type your message...";

/// Full-width input bar for composing messages.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    focused: bool,
    loading: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            focused: false,
            loading: false,
        }
    }

    /// Set whether the input bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Show the waiting indicator instead of the input.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Build the input line with prompt and cursor.
    fn build_input_line(&self) -> Line<'static> {
        let prompt = Span::styled("> ".to_string(), Style::default().fg(self.theme.primary));

        if self.input.is_empty() {
            let tail = if self.focused {
                Span::styled("█".to_string(), Style::default().fg(self.theme.text))
            } else {
                Span::styled(
                    PLACEHOLDER.to_string(),
                    Style::default().fg(self.theme.muted),
                )
            };
            return Line::from(vec![prompt, tail]);
        }

        let chars: Vec<char> = self.input.content().chars().collect();
        let cursor = self.input.cursor.min(chars.len());
        let before: String = chars[..cursor].iter().collect();
        let after: String = chars[cursor..].iter().collect();

        let text_style = Style::default().fg(self.theme.text);
        let mut spans = vec![prompt, Span::styled(before, text_style)];
        if self.focused {
            spans.push(Span::styled("█".to_string(), text_style));
        }
        spans.push(Span::styled(after, text_style));
        Line::from(spans)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);

        let paragraph = if self.loading {
            Paragraph::new("● Ava is thinking...")
                .block(block)
                .style(Style::default().fg(self.theme.muted))
        } else {
            Paragraph::new(self.build_input_line()).block(block)
        };

        paragraph.render(area, buf);
    }
}
