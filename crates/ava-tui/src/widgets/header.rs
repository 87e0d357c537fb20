//! Greeting banner at the top of the chat window.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

const TITLE: &str = "Hey 👋, I'm Ava";
const SUBTITLE: &str = "Ask me anything or pick a place to start";

/// Greeting banner with title and subtitle.
pub struct Header<'a> {
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    /// Create a new header.
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::styled(
                TITLE,
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                SUBTITLE,
                Style::default().fg(self.theme.subtext),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(self.theme.base))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_header_renders_greeting() {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(Header::new(&theme), frame.area()))
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(content.contains("I'm Ava"));
        assert!(content.contains("pick a place to start"));
    }
}
