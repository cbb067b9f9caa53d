//! Plain-text export of the formatted lines
//!
//! Export text is the visible text of every line with indentation widened
//! from `INDENT_WIDTH` to four spaces per level, optionally prefixed by an XML
//! declaration. `document_xml` serializes a whole loaded document instead.
//! Nothing here touches the filesystem.

use crate::model::document::LoadedDocument;
use crate::model::node::write_xml;
use crate::primitives::styled_text::StyledLine;
use crate::view::formatter::INDENT_WIDTH;
use crate::view::theme::Theme;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const EXPORT_INDENT: usize = 4;

/// Visible text with indentation re-normalized to four spaces per level.
/// Leading spaces that do not make up a full level are kept as they are.
pub fn plain_text(lines: &[StyledLine]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let text = line.text();
        let body = text.trim_start_matches(' ');
        let leading = text.len() - body.len();
        let levels = leading / INDENT_WIDTH;
        let remainder = leading % INDENT_WIDTH;
        out.extend(std::iter::repeat(' ').take(levels * EXPORT_INDENT + remainder));
        out.push_str(body);
    }
    out
}

/// Export text as a standalone document, declaration first
pub fn document_text(lines: &[StyledLine]) -> String {
    let text = plain_text(lines);
    if text.trim_start().starts_with("<?xml") {
        return text;
    }
    format!("{XML_DECLARATION}\n{text}")
}

/// The entire document, independent of any query, indented four spaces per
/// level with the declaration first
pub fn document_xml(document: &LoadedDocument) -> String {
    let mut out = String::with_capacity(document.total_bytes + XML_DECLARATION.len() + 1);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    let _ = write_xml(document.root(), Some(&" ".repeat(EXPORT_INDENT)), &mut out);
    out
}

/// The lines as `<color=#rrggbb>` markup, one line per row
pub fn markup(lines: &[StyledLine], theme: &Theme) -> String {
    let rendered: Vec<String> = lines
        .iter()
        .map(|line| line.to_markup(|kind| theme.span_color(kind).to_array()))
        .collect();
    rendered.join("\n")
}
