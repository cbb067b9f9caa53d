//! Styled line representation for formatted documents
//!
//! A formatted document is stored as one `StyledLine` per display line.
//! Each line keeps its visible text in a single `String` and describes the
//! coloring as a list of style runs over that text. Search and measurement
//! read the visible text directly; only rendering looks at the runs.
//!
//! A markup rendering (`<color=#rrggbb>...</color>`) is available for interop
//! with hosts that draw rich-text strings, together with `strip_markup` which
//! removes those tags again.

use std::fmt::Write as _;

/// Syntactic role of a span of formatted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// Element names in opening and closing tags
    TagName,
    /// Attribute names
    AttrName,
    /// Quoted attribute values
    AttrValue,
    /// Text node content
    Text,
    /// Comments, node headers and the depth placeholder
    Comment,
    /// `<`, `>`, `/` and `=`
    Punctuation,
    /// Indentation and separating spaces
    Whitespace,
}

/// A run of `len` bytes of line text drawn with one style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRun {
    pub kind: SpanKind,
    pub len: usize,
}

/// One line of formatted text: visible text plus style runs covering it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    text: String,
    runs: Vec<StyleRun>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a line drawn entirely in one style
    pub fn plain(kind: SpanKind, text: &str) -> Self {
        let mut line = Self::new();
        line.push(kind, text);
        line
    }

    /// Append text in the given style, extending the last run when the style matches
    pub fn push(&mut self, kind: SpanKind, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.push_str(text);
        match self.runs.last_mut() {
            Some(run) if run.kind == kind => run.len += text.len(),
            _ => self.runs.push(StyleRun {
                kind,
                len: text.len(),
            }),
        }
    }

    /// Visible (markup-free) text of the line
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    /// Iterate over `(kind, text)` pairs in order
    pub fn spans(&self) -> impl Iterator<Item = (SpanKind, &str)> + '_ {
        let mut offset = 0;
        self.runs.iter().map(move |run| {
            let start = offset;
            offset += run.len;
            (run.kind, &self.text[start..offset])
        })
    }

    /// Number of characters in the visible text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Render the line as color markup using `color_of` to pick each span's color.
    /// Whitespace runs are emitted without tags.
    pub fn to_markup(&self, color_of: impl Fn(SpanKind) -> [u8; 3]) -> String {
        let mut out = String::with_capacity(self.text.len() * 2);
        for (kind, text) in self.spans() {
            if kind == SpanKind::Whitespace {
                out.push_str(text);
                continue;
            }
            let [r, g, b] = color_of(kind);
            let _ = write!(out, "<color=#{r:02x}{g:02x}{b:02x}>{text}</color>");
        }
        out
    }
}

/// Remove `<color>`, `<color=...>` and `</color>` tags (case-insensitive),
/// leaving everything else untouched.
pub fn strip_markup(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(rel) = memchr::memchr(b'<', &bytes[pos..]) {
        let lt = pos + rel;
        match color_tag_len(&bytes[lt..]) {
            Some(len) => {
                out.push_str(&s[copied..lt]);
                pos = lt + len;
                copied = pos;
            }
            None => pos = lt + 1,
        }
    }
    out.push_str(&s[copied..]);
    out
}

/// Length of a color tag starting at `bytes[0] == b'<'`, if there is one
fn color_tag_len(bytes: &[u8]) -> Option<usize> {
    let mut i = 1;
    if bytes.get(i) == Some(&b'/') {
        i += 1;
    }
    let name = bytes.get(i..i + 5)?;
    if !name.eq_ignore_ascii_case(b"color") {
        return None;
    }
    i += 5;
    match bytes.get(i)? {
        b'>' => Some(i + 1),
        b'=' if bytes[1] != b'/' => {
            let close = memchr::memchr(b'>', &bytes[i..])?;
            Some(i + close + 1)
        }
        _ => None,
    }
}
