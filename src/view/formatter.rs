//! Colorized document formatter
//!
//! Turns a list of nodes into indented, syntax-colored lines.
//!
//! Key concepts:
//! - Every emitted line ends with a newline, so the output always finishes
//!   with one empty trailing segment. The line cache trims it.
//! - When several nodes are formatted together, each gets a
//!   `<!-- Node i / N -->` header, separated from the previous node by one
//!   blank line.
//! - Nesting deeper than `MAX_DEPTH` is replaced by a single `...` line so
//!   pathological documents cannot blow up render cost.

use crate::model::node::{Node, NodeKind};
use crate::primitives::styled_text::{SpanKind, StyledLine};

/// Spaces per nesting level
pub const INDENT_WIDTH: usize = 2;

/// Deepest level at which element children are still expanded
pub const MAX_DEPTH: usize = 64;

/// Position of a single node within the result set it was picked from (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHint {
    pub index: usize,
    pub total: usize,
}

/// Output of the formatter: newline-delimited segments with style runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedText {
    segments: Vec<StyledLine>,
}

impl FormattedText {
    pub fn from_segments(segments: Vec<StyledLine>) -> Self {
        Self { segments }
    }

    /// Segments as they would appear when splitting the text on `\n`
    pub fn segments(&self) -> &[StyledLine] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<StyledLine> {
        self.segments
    }

    /// Visible text with `\n` between segments
    pub fn plain_text(&self) -> String {
        join_lines(self.segments.iter().map(StyledLine::text))
    }

    /// Render as a `<color=#rrggbb>` markup string
    pub fn to_markup(&self, color_of: impl Fn(SpanKind) -> [u8; 3]) -> String {
        join_lines(self.segments.iter().map(|line| line.to_markup(&color_of)))
    }
}

fn join_lines<S: AsRef<str>>(lines: impl Iterator<Item = S>) -> String {
    let mut out = String::new();
    for (i, line) in lines.enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

/// Format `nodes` into colorized lines.
///
/// With more than one node, each node is preceded by a header comment.
/// With a single node and an `index_hint`, one header naming its position in
/// the original result set is prepended instead.
pub fn format(nodes: &[&Node], index_hint: Option<IndexHint>) -> FormattedText {
    let mut writer = LineWriter::default();

    if nodes.len() == 1 {
        if let Some(hint) = index_hint {
            writer.header(hint.index, hint.total);
        }
    }

    let with_headers = nodes.len() > 1;
    for (i, node) in nodes.iter().enumerate() {
        if with_headers {
            if i > 0 {
                writer.end_line();
            }
            writer.header(i + 1, nodes.len());
        }
        writer.node(node, 0);
    }

    writer.finish()
}

#[derive(Default)]
struct LineWriter {
    lines: Vec<StyledLine>,
    current: StyledLine,
}

impl LineWriter {
    fn finish(mut self) -> FormattedText {
        // Every line was terminated, so the text ends with an empty segment
        self.lines.push(std::mem::take(&mut self.current));
        FormattedText::from_segments(self.lines)
    }

    fn push(&mut self, kind: SpanKind, text: &str) {
        self.current.push(kind, text);
    }

    fn end_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
    }

    fn indent(&mut self, depth: usize) {
        if depth > 0 {
            self.push(SpanKind::Whitespace, &" ".repeat(depth * INDENT_WIDTH));
        }
    }

    fn header(&mut self, index: usize, total: usize) {
        self.push(SpanKind::Comment, &format!("<!-- Node {index} / {total} -->"));
        self.end_line();
    }

    /// Emit `text` one line per segment, each indented to `depth`
    fn block(&mut self, text: &str, depth: usize, kind: SpanKind) {
        let normalized = normalize_newlines(text);
        for segment in normalized.split('\n') {
            self.indent(depth);
            self.push(kind, segment);
            self.end_line();
        }
    }

    fn node(&mut self, node: &Node, depth: usize) {
        match node.kind {
            NodeKind::Comment => {
                let comment = format!("<!-- {} -->", node.value.trim());
                self.block(&comment, depth, SpanKind::Comment);
            }
            NodeKind::Text => self.block(&node.value, depth, SpanKind::Text),
            NodeKind::Element => self.element(node, depth),
        }
    }

    fn element(&mut self, node: &Node, depth: usize) {
        self.indent(depth);
        self.push(SpanKind::Punctuation, "<");
        self.push(SpanKind::TagName, &node.name);
        for attr in &node.attributes {
            self.push(SpanKind::Whitespace, " ");
            self.push(SpanKind::AttrName, &attr.name);
            self.push(SpanKind::Punctuation, "=");
            self.push(SpanKind::AttrValue, &format!("\"{}\"", attr.value));
        }

        if !node.has_children() {
            self.push(SpanKind::Whitespace, " ");
            self.push(SpanKind::Punctuation, "/>");
            self.end_line();
            return;
        }

        if let Some(text) = node.single_text_child() {
            if text.contains(['\n', '\r']) {
                self.push(SpanKind::Punctuation, ">");
                self.end_line();
                self.block(text, depth + 1, SpanKind::Text);
                self.closing_tag(&node.name, depth);
            } else {
                self.push(SpanKind::Punctuation, ">");
                self.push(SpanKind::Text, text);
                self.push(SpanKind::Punctuation, "</");
                self.push(SpanKind::TagName, &node.name);
                self.push(SpanKind::Punctuation, ">");
                self.end_line();
            }
            return;
        }

        self.push(SpanKind::Punctuation, ">");
        self.end_line();
        if depth + 1 >= MAX_DEPTH {
            self.block("...", depth + 1, SpanKind::Comment);
        } else {
            for child in &node.children {
                self.node(child, depth + 1);
            }
        }
        self.closing_tag(&node.name, depth);
    }

    fn closing_tag(&mut self, name: &str, depth: usize) {
        self.indent(depth);
        self.push(SpanKind::Punctuation, "</");
        self.push(SpanKind::TagName, name);
        self.push(SpanKind::Punctuation, ">");
        self.end_line();
    }
}

/// Convert `\r\n` and lone `\r` to `\n`
fn normalize_newlines(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.contains('\r') {
        return std::borrow::Cow::Borrowed(text);
    }
    std::borrow::Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
