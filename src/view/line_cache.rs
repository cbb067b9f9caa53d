//! Display lines and content metrics for the current selection
//!
//! Built once per selection change. Content width is found with a two-phase
//! estimate: a line is only measured exactly when its cheap heuristic width
//! could beat the running maximum, so most lines of a large document are
//! never measured at all.

use crate::primitives::display_width::TextMetrics;
use crate::primitives::styled_text::StyledLine;
use crate::view::formatter::FormattedText;

/// Size of the scrollable content
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentMetrics {
    pub line_height: f32,
    /// Widest line found by the two-phase estimate
    pub content_width: f32,
    /// `line_count * line_height`
    pub content_height: f32,
}

/// The formatted lines of the current selection
#[derive(Debug, Clone, Default)]
pub struct LineCache {
    lines: Vec<StyledLine>,
    metrics: ContentMetrics,
    /// How many lines needed an exact width measurement
    exact_measurements: usize,
}

impl LineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build with the heuristic ratio of the active font
    pub fn build(formatted: FormattedText, text_metrics: &dyn TextMetrics) -> Self {
        Self::build_with_ratio(formatted, text_metrics, text_metrics.heuristic_ratio())
    }

    /// Build with an explicit glyph-advance to line-height ratio for the width estimate
    pub fn build_with_ratio(
        formatted: FormattedText,
        text_metrics: &dyn TextMetrics,
        heuristic_ratio: f32,
    ) -> Self {
        let mut lines = formatted.into_segments();
        trim_trailing_artifacts(&mut lines);

        let line_height = text_metrics.line_height();
        let mut content_width = 0.0f32;
        let mut exact_measurements = 0;
        for line in &lines {
            let estimate = line.char_count() as f32 * line_height * heuristic_ratio;
            if estimate > content_width {
                exact_measurements += 1;
                let exact = text_metrics.text_width(line.text());
                if exact > content_width {
                    content_width = exact;
                }
            }
        }

        let metrics = ContentMetrics {
            line_height,
            content_width,
            content_height: lines.len() as f32 * line_height,
        };
        tracing::debug!(
            lines = lines.len(),
            exact_measurements,
            content_width,
            "line cache rebuilt"
        );

        Self {
            lines,
            metrics,
            exact_measurements,
        }
    }

    pub fn lines(&self) -> &[StyledLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&StyledLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn metrics(&self) -> ContentMetrics {
        self.metrics
    }

    pub fn exact_measurements(&self) -> usize {
        self.exact_measurements
    }
}

/// Drop trailing segments left behind by the final newline: empty lines and
/// lines holding a single whitespace or control character. The first line is kept.
fn trim_trailing_artifacts(lines: &mut Vec<StyledLine>) {
    while lines.len() > 1 && lines.last().is_some_and(is_artifact) {
        lines.pop();
    }
}

fn is_artifact(line: &StyledLine) -> bool {
    let mut chars = line.text().chars();
    match (chars.next(), chars.next()) {
        (None, _) => true,
        (Some(c), None) => c.is_whitespace() || c.is_control(),
        _ => false,
    }
}
