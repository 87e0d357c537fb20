//! Bottom footer: active context, key hints, and notification banner.
//!
//! When a notification is present it replaces the hints until it
//! expires or is dismissed with Esc.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use ava_core::SalesContext;

use crate::theme::Theme;

/// A single key hint (key, description).
pub struct KeyHint {
    pub key: &'static str,
    pub description: &'static str,
}

/// Footer line with context, hints, and notifications.
pub struct Footer<'a> {
    theme: &'a Theme,
    context: SalesContext,
    hints: Vec<KeyHint>,
    notification: Option<&'a str>,
}

impl<'a> Footer<'a> {
    /// Create a new footer showing the active context.
    pub fn new(theme: &'a Theme, context: SalesContext) -> Self {
        Self {
            theme,
            context,
            hints: Vec::new(),
            notification: None,
        }
    }

    /// Set the key hints to display.
    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Set the notification banner, replacing the hints.
    #[must_use]
    pub fn notification(mut self, notification: Option<&'a str>) -> Self {
        self.notification = notification;
        self
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled("Context: ", Style::default().fg(self.theme.muted)),
            Span::styled(
                self.context.as_str(),
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ];

        if let Some(notification) = self.notification {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!(" {notification} "),
                Style::default()
                    .fg(self.theme.base)
                    .bg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            for hint in &self.hints {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    hint.key,
                    Style::default()
                        .fg(self.theme.text)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(
                    format!(" {}", hint.description),
                    Style::default().fg(self.theme.muted),
                ));
            }
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}
