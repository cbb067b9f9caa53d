//! Literal, case-insensitive match index over the display lines
//!
//! Matching works on the visible text of each line. Offsets are character
//! indices so they stay meaningful for non-ASCII content. Occurrences never
//! overlap: after a hit the scan resumes at the end of that hit.

use crate::primitives::display_width::TextMetrics;
use crate::view::line_cache::LineCache;

/// One occurrence of the needle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSpan {
    /// 0-based line index
    pub line: usize,
    /// Character offset of the match in the line's visible text
    pub start: usize,
    /// Length in characters
    pub length: usize,
    /// Content-space x of the match start (`code_left_pad + width(prefix)`)
    pub x: f32,
    /// Drawn width of the matched text
    pub width: f32,
    /// Vertical center of the line as a fraction of content height
    pub normalized_y: f32,
}

/// Find every non-overlapping, case-insensitive occurrence of `needle` in `haystack`.
/// Returns `(start, length)` pairs in characters.
pub fn find_all(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = needle.chars().map(fold_case).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let hay: Vec<char> = haystack.chars().map(fold_case).collect();

    let mut hits = Vec::new();
    let mut pos = 0;
    while pos + needle.len() <= hay.len() {
        if hay[pos..pos + needle.len()] == needle[..] {
            hits.push((pos, needle.len()));
            pos += needle.len();
        } else {
            pos += 1;
        }
    }
    hits
}

/// Simple one-to-one case folding so character offsets are preserved
fn fold_case(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Byte index of the `char_index`-th character (or the end of the string)
fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map_or(s.len(), |(byte, _)| byte)
}

/// Build the match list for `needle` over every line of `lines`
pub fn build(
    lines: &LineCache,
    needle: &str,
    text_metrics: &dyn TextMetrics,
    code_left_pad: f32,
) -> Vec<MatchSpan> {
    let metrics = lines.metrics();
    let content_height = metrics.content_height.max(1.0);

    let mut matches = Vec::new();
    for (line_index, line) in lines.lines().iter().enumerate() {
        let visible = line.text();
        let hits = find_all(visible, needle);
        if hits.is_empty() {
            continue;
        }
        let normalized_y = ((line_index as f32 + 0.5) * metrics.line_height) / content_height;
        for (start, length) in hits {
            let start_byte = byte_offset(visible, start);
            let end_byte = start_byte + byte_offset(&visible[start_byte..], length);
            matches.push(MatchSpan {
                line: line_index,
                start,
                length,
                x: code_left_pad + text_metrics.text_width(&visible[..start_byte]),
                width: text_metrics.text_width(&visible[start_byte..end_byte]),
                normalized_y,
            });
        }
    }
    matches
}
