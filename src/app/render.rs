use super::App;
use crate::model::document::DocumentVariant;
use crate::view::draw::Rect as ViewRect;
use crate::view::ui::{CommandsWidget, StatusBarRenderer, StatusLine, TabBarRenderer, TabEntry};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

impl App {
    /// Render the viewer to the terminal
    pub fn render(&mut self, frame: &mut Frame) {
        let _span = tracing::trace_span!("render").entered();

        // [tabs, content, status bar]
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let current = self.viewer.current_variant();
        let tabs: Vec<TabEntry> = DocumentVariant::ALL
            .iter()
            .map(|&variant| TabEntry {
                label: self.viewer.tab_label(variant),
                active: variant == current,
                available: self.viewer.documents().get(variant).is_some(),
            })
            .collect();
        let theme = self.viewer.viewport().theme().clone();
        TabBarRenderer::render(frame, chunks[0], &tabs, &theme);

        let content = chunks[1];
        let output = self.viewer.draw(to_view_rect(content));
        frame.render_widget(CommandsWidget::new(&output.commands, &theme), content);

        let status = self.status_line();
        StatusBarRenderer::render(frame, chunks[2], &status, &theme);
    }

    fn status_line(&self) -> StatusLine {
        let viewer = &self.viewer;

        let left = match (&self.notice, viewer.query()) {
            (Some(notice), _) => notice.clone(),
            (None, Some(query)) => {
                let millis = viewer.tabs().current().query_millis;
                format!("{query} ({millis} ms)")
            }
            (None, None) => "Press : to enter a query".to_string(),
        };

        let right = [viewer.selection_label(), viewer.search_label()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("  |  ");

        StatusLine {
            left,
            right,
            prompt: self
                .mode
                .prompt_label()
                .map(|label| (label.to_string(), self.input.clone())),
        }
    }
}

fn to_view_rect(area: Rect) -> ViewRect {
    ViewRect::new(
        area.x as f32,
        area.y as f32,
        area.width as f32,
        area.height as f32,
    )
}
