//! Line number gutter sizing

use crate::primitives::display_width::TextMetrics;

/// Number of digit columns reserved for line numbers: at least two
pub fn digit_count(line_count: usize) -> usize {
    let digits = line_count.checked_ilog10().map_or(1, |d| d as usize + 1);
    digits.max(2)
}

/// Glyph widths the gutter is sized from
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GutterMetrics {
    /// Widest of the glyphs `0`..=`9`
    pub digit_width: f32,
    pub space_width: f32,
}

impl GutterMetrics {
    pub fn measure(text_metrics: &dyn TextMetrics) -> Self {
        let digit_width = ('0'..='9')
            .map(|c| text_metrics.text_width(c.encode_utf8(&mut [0; 4])))
            .fold(0.0f32, f32::max);
        Self {
            digit_width,
            space_width: text_metrics.text_width(" "),
        }
    }

    /// Total gutter width for `line_count` lines
    pub fn width(&self, line_count: usize, left_pad: f32, right_pad: f32) -> f32 {
        digit_count(line_count) as f32 * self.digit_width + self.space_width + left_pad + right_pad
    }
}

/// Gutter metrics cached per font scale
#[derive(Debug, Clone, Default)]
pub struct GutterCache {
    cached: Option<(f32, GutterMetrics)>,
}

impl GutterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics for the current font, measuring only when the scale changed
    pub fn metrics(&mut self, text_metrics: &dyn TextMetrics) -> GutterMetrics {
        let scale = text_metrics.scale();
        match self.cached {
            Some((cached_scale, metrics)) if cached_scale == scale => metrics,
            _ => {
                let metrics = GutterMetrics::measure(text_metrics);
                tracing::trace!(scale, ?metrics, "gutter metrics measured");
                self.cached = Some((scale, metrics));
                metrics
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
