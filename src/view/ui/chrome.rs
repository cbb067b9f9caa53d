//! Tab bar and status bar rendering

use crate::primitives::display_width::str_width;
use crate::view::theme::Theme;
use crate::view::ui::painter::to_color;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// One entry in the tab bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    pub label: String,
    pub active: bool,
    /// Whether the tab has a document to show
    pub available: bool,
}

pub struct TabBarRenderer;

impl TabBarRenderer {
    pub fn render(frame: &mut Frame, area: Rect, tabs: &[TabEntry], theme: &Theme) {
        let bar_style = Style::default()
            .fg(to_color(theme.line_number))
            .bg(to_color(theme.gutter_background));

        let mut spans = Vec::new();
        for (i, tab) in tabs.iter().enumerate() {
            let style = if tab.active {
                Style::default()
                    .fg(to_color(theme.text))
                    .bg(to_color(theme.background))
                    .add_modifier(Modifier::BOLD)
            } else if tab.available {
                bar_style.fg(to_color(theme.punctuation))
            } else {
                bar_style.add_modifier(Modifier::DIM)
            };
            spans.push(Span::styled(format!(" {} {} ", i + 1, tab.label), style));
            spans.push(Span::styled(" ", bar_style));
        }

        let paragraph = Paragraph::new(Line::from(spans)).style(bar_style);
        frame.render_widget(paragraph, area);
    }
}

/// What the status bar shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub left: String,
    pub right: String,
    /// Prompt being edited; replaces `left` and places the cursor after it
    pub prompt: Option<(String, String)>,
}

pub struct StatusBarRenderer;

impl StatusBarRenderer {
    pub fn render(frame: &mut Frame, area: Rect, status: &StatusLine, theme: &Theme) {
        let style = Style::default()
            .fg(to_color(theme.text))
            .bg(to_color(theme.gutter_separator));

        let left = match &status.prompt {
            Some((label, input)) => format!(" {label}: {input}"),
            None => format!(" {}", status.left),
        };
        let right = format!("{} ", status.right);

        let width = area.width as usize;
        let left_width = str_width(&left);
        let right_width = str_width(&right);
        let mut spans = vec![Span::styled(left.clone(), style)];
        if left_width + right_width < width {
            spans.push(Span::styled(
                " ".repeat(width - left_width - right_width),
                style,
            ));
            spans.push(Span::styled(right, style.add_modifier(Modifier::BOLD)));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);

        if status.prompt.is_some() {
            let x = area.x + (left_width as u16).min(area.width.saturating_sub(1));
            frame.set_cursor_position(Position::new(x, area.y));
        }
    }
}
