//! Centered overlay menu.
//!
//! Used for the message action menu (Edit/Delete) and the context
//! picker. Renders a small bordered list over the chat area.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::theme::Theme;

/// Centered overlay list menu.
pub struct Menu<'a> {
    title: &'a str,
    items: &'a [&'a str],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> Menu<'a> {
    /// Create a new menu with the given items.
    pub fn new(title: &'a str, items: &'a [&'a str], theme: &'a Theme) -> Self {
        Self {
            title,
            items,
            selected: 0,
            theme,
        }
    }

    /// Set the highlighted item index.
    #[must_use]
    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    /// Compute the centered popup area within `area`.
    #[allow(clippy::cast_possible_truncation)]
    fn popup_area(&self, area: Rect) -> Rect {
        let width = self
            .items
            .iter()
            .map(|i| i.chars().count())
            .chain(std::iter::once(self.title.chars().count()))
            .max()
            .unwrap_or(0) as u16
            + 8;
        let height = self.items.len() as u16 + 2;

        let width = width.min(area.width);
        let height = height.min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }
}

impl Widget for Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = self.popup_area(area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused))
            .style(Style::default().bg(self.theme.surface));

        let lines: Vec<Line<'static>> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == self.selected {
                    Line::from(Span::styled(
                        format!(" ▸ {item}"),
                        Style::default()
                            .fg(self.theme.primary)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("   {item}"),
                        Style::default().fg(self.theme.text),
                    ))
                }
            })
            .collect();

        Paragraph::new(lines).block(block).render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_menu_renders_items_and_highlight() {
        let theme = Theme::default();
        let items = ["Edit", "Delete"];
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();

        terminal
            .draw(|frame| {
                let menu = Menu::new("Message", &items, &theme).selected(1);
                frame.render_widget(menu, frame.area());
            })
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(content.contains("Message"));
        assert!(content.contains("Edit"));
        assert!(content.contains("▸ Delete"));
    }

    #[test]
    fn test_menu_fits_small_area() {
        let theme = Theme::default();
        let items = ["Onboarding", "Closing", "Negotiation"];
        let mut terminal = Terminal::new(TestBackend::new(12, 3)).unwrap();

        terminal
            .draw(|frame| {
                let menu = Menu::new("Context", &items, &theme);
                frame.render_widget(menu, frame.area());
            })
            .unwrap();
    }
}
