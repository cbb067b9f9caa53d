//! Virtualized code viewport
//!
//! Owns the formatted lines of the current selection and renders only the
//! slice that intersects the visible area, next to a line number gutter that
//! does not scroll horizontally.
//!
//! Key concepts:
//! - **Reformat** happens only in `set_nodes`. Scrolling and resizing just
//!   move the visible window.
//! - **Pending jumps** are resolved at the start of `draw`, after the
//!   viewport geometry is known and before the visible range is computed.
//! - **Scroll** is clamped to `[0, max(0, content - visible)]` on both axes
//!   every frame.

use crate::config::ViewerConfig;
use crate::model::node::Node;
use crate::primitives::display_width::TextMetrics;
use crate::search::navigation::SearchState;
use crate::view::draw::{Align, DrawCommand, Rect, Vec2};
use crate::view::formatter::{self, IndexHint};
use crate::view::gutter::{self, GutterCache};
use crate::view::jump::{self, JumpFrame, JumpTarget};
use crate::view::line_cache::LineCache;
use crate::view::markers::{self, MarkerTrack};
use crate::view::theme::Theme;

/// Spacing and sizes of the viewport chrome, in host units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLayout {
    /// Margin between the panel edge and its contents
    pub content_inset: f32,
    /// Gap between the gutter and the first column of code
    pub code_left_pad: f32,
    /// Vertical offset of match highlights relative to their line
    pub code_vertical_padding: f32,
    pub gutter_left_pad: f32,
    pub gutter_right_pad: f32,
    pub gutter_separator: f32,
    pub scrollbar_width: f32,
    /// Marker width as a fraction of the scrollbar width
    pub marker_width_ratio: f32,
    pub marker_inset: f32,
    pub min_marker_height: f32,
    /// Margin kept around a jump target
    pub jump_padding: f32,
    pub highlight_border: f32,
    pub show_copy_affordance: bool,
    pub copy_size: f32,
    pub copy_padding: f32,
}

impl ViewportLayout {
    /// Layout for a terminal, where one unit is one cell
    pub fn cells() -> Self {
        Self {
            content_inset: 0.0,
            code_left_pad: 1.0,
            code_vertical_padding: 0.0,
            gutter_left_pad: 0.0,
            gutter_right_pad: 1.0,
            gutter_separator: 1.0,
            scrollbar_width: 1.0,
            marker_width_ratio: 1.0,
            marker_inset: 0.0,
            min_marker_height: 1.0,
            jump_padding: 2.0,
            highlight_border: 1.0,
            show_copy_affordance: false,
            copy_size: 1.0,
            copy_padding: 0.0,
        }
    }

    /// Layout for a pixel-based host with proportional UI fonts
    pub fn pixels() -> Self {
        Self {
            content_inset: 4.0,
            code_left_pad: 4.0,
            code_vertical_padding: 2.0,
            gutter_left_pad: 4.0,
            gutter_right_pad: 8.0,
            gutter_separator: 1.0,
            scrollbar_width: 16.0,
            marker_width_ratio: 0.75,
            marker_inset: 1.0,
            min_marker_height: 2.0,
            jump_padding: 48.0,
            highlight_border: 2.0,
            show_copy_affordance: true,
            copy_size: 32.0,
            copy_padding: 12.0,
        }
    }

    /// Terminal layout with the overrides from the viewer config
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            code_left_pad: config.code_left_pad,
            gutter_left_pad: config.gutter_left_pad,
            gutter_right_pad: config.gutter_right_pad,
            marker_inset: config.marker_inset,
            min_marker_height: config.min_marker_height,
            jump_padding: config.jump_padding,
            show_copy_affordance: config.show_copy_affordance,
            ..Self::cells()
        }
    }
}

impl Default for ViewportLayout {
    fn default() -> Self {
        Self::cells()
    }
}

/// Inclusive range of rendered line indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub fn line_count(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

/// Visible line range for a scroll offset: one extra line below the bottom
/// edge is included so partially scrolled lines never pop in late.
pub fn visible_range(top_y: f32, height: f32, line_height: f32, line_count: usize) -> Option<VisibleRange> {
    if line_count == 0 || line_height <= 0.0 {
        return None;
    }
    let last = line_count as i64 - 1;
    let start = ((top_y / line_height).floor() as i64).clamp(0, last);
    let end = (((top_y + height) / line_height).ceil() as i64 + 1).clamp(start, last);
    Some(VisibleRange {
        start: start as usize,
        end: end as usize,
    })
}

/// Result of one render pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderOutput {
    pub range: Option<VisibleRange>,
    /// Visible text of the rendered lines joined with `\n`
    pub visible_text: String,
    /// 1-based line numbers of the rendered lines joined with `\n`
    pub line_numbers: String,
    pub commands: Vec<DrawCommand>,
    /// Scroll offset after jumps and clamping
    pub scroll: Vec2,
    pub has_vertical_scroll: bool,
    pub has_horizontal_scroll: bool,
    /// Rect of the scrolled code area on screen
    pub code_rect: Rect,
}

/// The code viewport for the current selection
#[derive(Debug, Clone, Default)]
pub struct CodeViewport {
    layout: ViewportLayout,
    theme: Theme,
    heuristic_ratio: Option<f32>,
    lines: LineCache,
    gutter: GutterCache,
}

impl CodeViewport {
    pub fn new(layout: ViewportLayout, theme: Theme) -> Self {
        Self {
            layout,
            theme,
            ..Self::default()
        }
    }

    /// Use a fixed glyph-advance ratio for width estimates instead of the font's own
    pub fn with_heuristic_ratio(mut self, ratio: Option<f32>) -> Self {
        self.heuristic_ratio = ratio;
        self
    }

    pub fn layout(&self) -> &ViewportLayout {
        &self.layout
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn lines(&self) -> &LineCache {
        &self.lines
    }

    /// Format `nodes` and rebuild the line cache
    pub fn set_nodes(&mut self, nodes: &[&Node], hint: Option<IndexHint>, text_metrics: &dyn TextMetrics) {
        let formatted = formatter::format(nodes, hint);
        let ratio = self
            .heuristic_ratio
            .unwrap_or_else(|| text_metrics.heuristic_ratio());
        self.lines = LineCache::build_with_ratio(formatted, text_metrics, ratio);
    }

    pub fn clear(&mut self) {
        self.lines = LineCache::new();
    }

    /// Rebuild the search index of `search` over the current lines
    pub fn reindex(&self, search: &mut SearchState, needle: &str, text_metrics: &dyn TextMetrics) {
        search.reindex(&self.lines, needle, text_metrics, self.layout.code_left_pad);
    }

    /// Draw commands for a panel showing only `message`
    pub fn draw_message(&self, area: Rect, message: &str) -> RenderOutput {
        let inner = area.contracted_by(self.layout.content_inset);
        RenderOutput {
            commands: vec![
                DrawCommand::FillRect {
                    rect: area,
                    color: self.theme.background,
                },
                DrawCommand::Label {
                    rect: inner,
                    text: message.to_string(),
                    color: self.theme.message,
                    align: Align::Left,
                    line_height: 1.0,
                },
            ],
            ..RenderOutput::default()
        }
    }

    /// Render the visible slice of the current lines into `area`.
    ///
    /// `jump` is the target taken from the tab's pending jump this frame.
    pub fn draw(
        &mut self,
        area: Rect,
        scroll: &mut Vec2,
        jump: Option<JumpTarget>,
        search: &SearchState,
        text_metrics: &dyn TextMetrics,
    ) -> RenderOutput {
        let layout = self.layout;
        let metrics = self.lines.metrics();
        let line_height = metrics.line_height;
        let line_count = self.lines.len();

        let mut commands = vec![DrawCommand::FillRect {
            rect: area,
            color: self.theme.background,
        }];

        let out = area.contracted_by(layout.content_inset);
        let gutter_metrics = self.gutter.metrics(text_metrics);
        let gutter_width =
            gutter_metrics.width(line_count, layout.gutter_left_pad, layout.gutter_right_pad);
        let digits = gutter::digit_count(line_count);

        let code_rect = Rect::new(
            out.x + gutter_width,
            out.y,
            (out.width - gutter_width).max(0.0),
            out.height,
        );
        let has_v = metrics.content_height > code_rect.height;
        let has_h = metrics.content_width > code_rect.width;
        let visible_height = code_rect.height - if has_h { layout.scrollbar_width } else { 0.0 };
        let visible_width = code_rect.width - if has_v { layout.scrollbar_width } else { 0.0 };
        let scroll_extent = Vec2::new(
            metrics.content_width + layout.code_left_pad,
            metrics.content_height + layout.code_vertical_padding,
        );
        let visible = Vec2::new(visible_width.max(0.0), visible_height.max(0.0));

        if let Some(target) = jump {
            let before = *scroll;
            jump::apply(
                &target,
                scroll,
                &JumpFrame {
                    line_height,
                    visible_width,
                    visible_height,
                    content_width: metrics.content_width,
                    content_height: metrics.content_height,
                    padding: layout.jump_padding,
                },
            );
            tracing::debug!(?target, ?before, after = ?*scroll, "jump applied");
        }
        jump::clamp_scroll(scroll, scroll_extent, visible);

        let range = visible_range(scroll.y, visible.y, line_height, line_count);
        let mut visible_text = String::new();
        let mut line_numbers = String::new();
        let mut slice = Vec::new();
        if let Some(range) = range {
            slice.reserve(range.line_count());
            for i in range.start..=range.end {
                if i > range.start {
                    visible_text.push('\n');
                    line_numbers.push('\n');
                }
                let line = &self.lines.lines()[i];
                visible_text.push_str(line.text());
                line_numbers.push_str(&(i + 1).to_string());
                slice.push(line.clone());
            }
        }
        tracing::trace!(?range, scroll_y = scroll.y, "viewport range");

        // Scrolled content
        commands.push(DrawCommand::BeginScroll {
            viewport: code_rect,
            offset: *scroll,
            content: Vec2::new(
                scroll_extent.x.max(visible.x),
                scroll_extent.y.max(visible.y),
            ),
        });
        if let Some(range) = range {
            for (i, m) in search.matches().iter().enumerate() {
                if !range.contains(m.line) {
                    continue;
                }
                let rect = Rect::new(
                    m.x,
                    m.line as f32 * line_height + layout.code_vertical_padding,
                    m.width,
                    line_height,
                );
                commands.push(DrawCommand::FillRect {
                    rect,
                    color: self.theme.match_fill(),
                });
                if search.active() == Some(i) {
                    commands.push(DrawCommand::StrokeRect {
                        rect,
                        color: self.theme.match_border(),
                        thickness: layout.highlight_border,
                    });
                }
            }
            commands.push(DrawCommand::Code {
                origin: Vec2::new(layout.code_left_pad, range.start as f32 * line_height),
                line_height,
                lines: slice,
            });
        }
        commands.push(DrawCommand::EndScroll);

        // Scrollbar markers
        if has_v && !search.matches().is_empty() {
            let track = MarkerTrack {
                rect: code_rect
                    .right_part(layout.scrollbar_width)
                    .middle_part(layout.scrollbar_width * layout.marker_width_ratio)
                    .trim_bottom(if has_h { layout.scrollbar_width } else { 0.0 }),
                inset: layout.marker_inset,
                min_marker_height: layout.min_marker_height,
            };
            let buckets = markers::bucketize(
                search.matches(),
                search.active(),
                &track,
                metrics.content_height,
                line_height,
            );
            for bucket in buckets {
                commands.push(DrawCommand::FillRect {
                    rect: bucket.rect,
                    color: self.theme.match_fill(),
                });
                if bucket.active {
                    commands.push(DrawCommand::StrokeRect {
                        rect: bucket.rect,
                        color: self.theme.match_border(),
                        thickness: 1.0,
                    });
                }
            }
        }

        // Fixed gutter
        let gutter_rect = Rect::new(out.x, out.y, gutter_width, code_rect.height);
        commands.push(DrawCommand::FillRect {
            rect: gutter_rect,
            color: self.theme.gutter_background,
        });
        commands.push(DrawCommand::FillRect {
            rect: Rect::new(
                gutter_rect.right() - layout.gutter_separator,
                out.y,
                layout.gutter_separator,
                code_rect.height,
            ),
            color: self.theme.gutter_separator,
        });
        if let Some(range) = range {
            let first_y = range.start as f32 * line_height - scroll.y;
            commands.push(DrawCommand::PushClip(gutter_rect));
            commands.push(DrawCommand::Label {
                rect: Rect::new(
                    out.x + layout.gutter_left_pad,
                    out.y + first_y,
                    digits as f32 * gutter_metrics.digit_width + gutter_metrics.space_width,
                    range.line_count() as f32 * line_height,
                ),
                text: line_numbers.clone(),
                color: self.theme.line_number,
                align: Align::Right,
                line_height,
            });
            commands.push(DrawCommand::PopClip);
        }

        if layout.show_copy_affordance {
            let horizontal = layout.copy_padding + if has_v { layout.scrollbar_width } else { 0.0 };
            let vertical = layout.copy_padding + if has_h { layout.scrollbar_width } else { 0.0 };
            let rect = area
                .right_part(layout.copy_size)
                .bottom_part(layout.copy_size)
                .translate(Vec2::new(-horizontal, -vertical));
            commands.push(DrawCommand::CopyAffordance { rect });
        }

        RenderOutput {
            range,
            visible_text,
            line_numbers,
            commands,
            scroll: *scroll,
            has_vertical_scroll: has_v,
            has_horizontal_scroll: has_h,
            code_rect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::display_width::{CellMetrics, MonospaceMetrics};
    use crate::view::jump::PendingJump;

    fn numbered(count: usize) -> Node {
        let mut root = Node::element("Defs");
        for i in 0..count {
            root = root.with_child(Node::element("li").with_text(i.to_string()));
        }
        root
    }

    fn viewport_with(node: &Node) -> CodeViewport {
        let mut vp = CodeViewport::new(ViewportLayout::cells(), Theme::default());
        vp.set_nodes(&[node], None, &CellMetrics);
        vp
    }

    #[test]
    fn test_visible_range_formula() {
        assert_eq!(
            visible_range(0.0, 10.0, 1.0, 100),
            Some(VisibleRange { start: 0, end: 11 })
        );
        assert_eq!(
            visible_range(95.5, 10.0, 1.0, 100),
            Some(VisibleRange { start: 95, end: 99 })
        );
        assert_eq!(
            visible_range(-3.0, 2.0, 16.0, 5),
            Some(VisibleRange { start: 0, end: 1 })
        );
        assert_eq!(visible_range(0.0, 10.0, 1.0, 0), None);
    }

    #[test]
    fn test_draw_renders_only_visible_slice() {
        let node = numbered(1000);
        let mut vp = viewport_with(&node);
        assert_eq!(vp.lines().len(), 1002);

        let mut scroll = Vec2::new(0.0, 500.0);
        let out = vp.draw(
            Rect::new(0.0, 0.0, 40.0, 10.0),
            &mut scroll,
            None,
            &SearchState::new(),
            &CellMetrics,
        );
        let range = out.range.unwrap();
        assert_eq!(range, VisibleRange { start: 500, end: 511 });
        assert_eq!(out.line_numbers.lines().next(), Some("501"));
        assert_eq!(out.visible_text.lines().count(), range.line_count());
        assert!(out.has_vertical_scroll);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let node = numbered(10);
        let mut vp = viewport_with(&node);
        let mut scroll = Vec2::new(-20.0, 1e6);
        let out = vp.draw(
            Rect::new(0.0, 0.0, 40.0, 5.0),
            &mut scroll,
            None,
            &SearchState::new(),
            &CellMetrics,
        );
        // 12 lines in a 5 row viewport
        assert_eq!(scroll, Vec2::new(0.0, 7.0));
        assert_eq!(out.scroll, scroll);
    }

    #[test]
    fn test_pending_jump_consumed_before_range() {
        let node = numbered(200);
        let mut vp = viewport_with(&node);
        let mut search = SearchState::new();
        vp.reindex(&mut search, "<li>150<", &CellMetrics);
        assert_eq!(search.matches().len(), 1);

        let mut pending = PendingJump::default();
        if let crate::search::navigation::NavigationOutcome::Jump(target) =
            search.advance(crate::search::navigation::Direction::Next)
        {
            pending.queue(target);
        }

        let mut scroll = Vec2::ZERO;
        let out = vp.draw(
            Rect::new(0.0, 0.0, 40.0, 10.0),
            &mut scroll,
            pending.take(),
            &search,
            &CellMetrics,
        );
        assert!(!pending.is_pending());
        let line = search.matches()[0].line;
        assert!(out.range.unwrap().contains(line));
        assert!(out
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::StrokeRect { .. })));
    }

    #[test]
    fn test_draw_order() {
        let node = numbered(100);
        let mut vp = viewport_with(&node);
        let mut search = SearchState::new();
        vp.reindex(&mut search, "li", &CellMetrics);
        let mut scroll = Vec2::ZERO;
        let out = vp.draw(
            Rect::new(0.0, 0.0, 40.0, 10.0),
            &mut scroll,
            None,
            &search,
            &CellMetrics,
        );

        let kinds: Vec<&str> = out
            .commands
            .iter()
            .map(|c| match c {
                DrawCommand::FillRect { .. } => "fill",
                DrawCommand::StrokeRect { .. } => "stroke",
                DrawCommand::Code { .. } => "code",
                DrawCommand::Label { .. } => "label",
                DrawCommand::BeginScroll { .. } => "begin",
                DrawCommand::EndScroll => "end",
                DrawCommand::PushClip(_) => "clip",
                DrawCommand::PopClip => "unclip",
                DrawCommand::CopyAffordance { .. } => "copy",
            })
            .collect();
        let pos = |k: &str| kinds.iter().position(|x| *x == k).unwrap();
        assert_eq!(kinds[0], "fill");
        assert!(pos("begin") < pos("code"));
        assert!(pos("code") < pos("end"));
        assert!(pos("end") < pos("label"));
        // Highlights sit between begin and code
        assert_eq!(kinds[pos("begin") + 1], "fill");
    }

    #[test]
    fn test_pixel_layout_copy_affordance_and_markers() {
        let node = numbered(300);
        let font = MonospaceMetrics::new(8.0, 16.0);
        let mut vp = CodeViewport::new(ViewportLayout::pixels(), Theme::default());
        vp.set_nodes(&[&node], None, &font);

        let mut search = SearchState::new();
        vp.reindex(&mut search, "<li>", &font);
        let mut scroll = Vec2::ZERO;
        let out = vp.draw(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            &mut scroll,
            None,
            &search,
            &font,
        );
        assert!(out
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::CopyAffordance { .. })));

        // Markers are drawn in screen space after the scroll region ends
        let end = out
            .commands
            .iter()
            .position(|c| *c == DrawCommand::EndScroll)
            .unwrap();
        let marker_fills = out.commands[end + 1..]
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { rect, .. } if rect.x > out.code_rect.right() - 16.0))
            .count();
        assert!(marker_fills > 0);
    }
}
