//! Text measurement for the active font configuration
//!
//! The viewport works in abstract units: pixels for a GUI host, cells for the
//! terminal host. `TextMetrics` is the only way the core learns how wide a
//! string is or how tall a line is.

use unicode_width::UnicodeWidthStr;

/// Font and text measurement primitives supplied by the host
pub trait TextMetrics {
    /// Height of one line of text
    fn line_height(&self) -> f32;

    /// Exact width of `text` when drawn on a single line
    fn text_width(&self, text: &str) -> f32;

    /// Scale factor of the current font configuration.
    /// Glyph caches are invalidated when this changes.
    fn scale(&self) -> f32 {
        1.0
    }

    /// Ratio of an average glyph advance to the line height.
    /// Used to estimate line widths before paying for an exact measurement.
    fn heuristic_ratio(&self) -> f32 {
        0.5
    }
}

/// Terminal cell metrics: one row per line, width in display columns
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMetrics;

impl TextMetrics for CellMetrics {
    fn line_height(&self) -> f32 {
        1.0
    }

    fn text_width(&self, text: &str) -> f32 {
        str_width(text) as f32
    }

    fn heuristic_ratio(&self) -> f32 {
        // A cell is one column wide and one row tall
        1.0
    }
}

/// Fixed-advance metrics for monospaced pixel fonts
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub line_height: f32,
    pub scale: f32,
}

impl MonospaceMetrics {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
            scale: 1.0,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn line_height(&self) -> f32 {
        self.line_height * self.scale
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance * self.scale
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn heuristic_ratio(&self) -> f32 {
        self.advance / self.line_height
    }
}

/// Display width of a string in terminal columns
#[inline]
pub fn str_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}
