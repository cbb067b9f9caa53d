//! Resolved colors for the code viewport

use crate::config::ThemeConfig;
use crate::primitives::styled_text::SpanKind;
use crate::view::draw::Rgba;

/// Colors used by the formatter spans, search highlights and viewport chrome
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub tag_name: Rgba,
    pub attr_name: Rgba,
    pub attr_value: Rgba,
    pub text: Rgba,
    pub comment: Rgba,
    pub punctuation: Rgba,
    /// Base color of match highlights and scrollbar markers
    pub match_color: Rgba,
    /// Alpha multiplier for match fills
    pub fill_ratio: f32,
    /// Alpha multiplier for the active match border
    pub border_ratio: f32,
    pub background: Rgba,
    pub gutter_background: Rgba,
    pub gutter_separator: Rgba,
    pub line_number: Rgba,
    pub message: Rgba,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            tag_name: Rgba::from_array(config.tag_name),
            attr_name: Rgba::from_array(config.attr_name),
            attr_value: Rgba::from_array(config.attr_value),
            text: Rgba::from_array(config.text),
            comment: Rgba::from_array(config.comment),
            punctuation: Rgba::from_array(config.punctuation),
            match_color: Rgba::from_array(config.match_color),
            fill_ratio: config.fill_ratio,
            border_ratio: config.border_ratio,
            background: Rgba::from_array(config.background),
            gutter_background: Rgba::from_array(config.gutter_background),
            gutter_separator: Rgba::from_array(config.gutter_separator),
            line_number: Rgba::from_array(config.line_number),
            message: Rgba::from_array(config.text),
        }
    }

    pub fn span_color(&self, kind: SpanKind) -> Rgba {
        match kind {
            SpanKind::TagName => self.tag_name,
            SpanKind::AttrName => self.attr_name,
            SpanKind::AttrValue => self.attr_value,
            SpanKind::Text | SpanKind::Whitespace => self.text,
            SpanKind::Comment => self.comment,
            SpanKind::Punctuation => self.punctuation,
        }
    }

    /// Fill color of a match highlight or scrollbar marker
    pub fn match_fill(&self) -> Rgba {
        self.match_color.with_alpha(self.fill_ratio)
    }

    /// Border color of the active match
    pub fn match_border(&self) -> Rgba {
        self.match_color.with_alpha(self.border_ratio)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}
