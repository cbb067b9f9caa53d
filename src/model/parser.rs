//! Non-validating XML parser
//!
//! Builds a `Node` tree from a UTF-8 string. Delimiters are located with
//! `memchr`, so the cost is dominated by the number of markup constructs
//! rather than the amount of text between them.
//!
//! Supported:
//! - elements with single- or double-quoted attributes
//! - text, with the predefined entities and numeric character references decoded
//! - comments and CDATA sections (CDATA becomes text)
//!
//! The XML declaration, processing instructions and DOCTYPE are skipped.
//! Whitespace-only text is dropped. Nesting is handled with an explicit stack,
//! so document depth never grows the call stack.

use crate::model::node::{Attribute, Node, NodeKind};
use memchr::{memchr, memchr2, memmem};
use std::borrow::Cow;
use std::fmt;

/// A parsed document: the single root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Node,
}

/// What went wrong while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedEof,
    UnexpectedChar(char),
    InvalidName,
    MismatchedTag { expected: String, found: String },
    UnexpectedClosingTag(String),
    DuplicateAttribute(String),
    UnclosedElement(String),
    TextOutsideRoot,
    MultipleRoots,
    NoRootElement,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            Self::InvalidName => write!(f, "invalid name"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "expected </{expected}>, found </{found}>")
            }
            Self::UnexpectedClosingTag(name) => write!(f, "unexpected closing tag </{name}>"),
            Self::DuplicateAttribute(name) => write!(f, "duplicate attribute {name:?}"),
            Self::UnclosedElement(name) => write!(f, "element <{name}> is never closed"),
            Self::TextOutsideRoot => write!(f, "text outside the root element"),
            Self::MultipleRoots => write!(f, "more than one root element"),
            Self::NoRootElement => write!(f, "no root element"),
        }
    }
}

/// Parse failure with the byte offset where it was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)
    }
}

impl std::error::Error for ParseError {}

/// Parse a complete XML document
pub fn parse(input: &str) -> Result<Document, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut parser = Parser {
        input,
        bytes: input.as_bytes(),
        pos: 0,
        stack: Vec::new(),
        root: None,
    };
    parser.run()?;

    let root = parser.root.ok_or(ParseError {
        offset: input.len(),
        kind: ParseErrorKind::NoRootElement,
    })?;
    tracing::debug!(bytes = input.len(), root = %root.name, "parsed document");
    Ok(Document { root })
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Open elements, innermost last, each with the offset of its `<`
    stack: Vec<(Node, usize)>,
    root: Option<Node>,
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<(), ParseError> {
        while self.pos < self.bytes.len() {
            match memchr(b'<', &self.bytes[self.pos..]) {
                None => {
                    let text = &self.input[self.pos..];
                    self.text(text, self.pos)?;
                    self.pos = self.bytes.len();
                }
                Some(rel) => {
                    let lt = self.pos + rel;
                    if rel > 0 {
                        let text = &self.input[self.pos..lt];
                        self.text(text, self.pos)?;
                    }
                    self.pos = lt;
                    self.markup()?;
                }
            }
        }

        if let Some((mut node, offset)) = self.stack.pop() {
            return Err(ParseError {
                offset,
                kind: ParseErrorKind::UnclosedElement(std::mem::take(&mut node.name)),
            });
        }
        Ok(())
    }

    fn error<T>(&self, kind: ParseErrorKind) -> Result<T, ParseError> {
        Err(ParseError {
            offset: self.pos,
            kind,
        })
    }

    fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(prefix)
    }

    /// Byte offset of `needle` at or after `pos`, or an EOF error
    fn find(&self, needle: &[u8]) -> Result<usize, ParseError> {
        match memmem::find(&self.bytes[self.pos..], needle) {
            Some(rel) => Ok(self.pos + rel),
            None => Err(ParseError {
                offset: self.bytes.len(),
                kind: ParseErrorKind::UnexpectedEof,
            }),
        }
    }

    fn markup(&mut self) -> Result<(), ParseError> {
        if self.starts_with(b"<!--") {
            let start = self.pos + 4;
            let end = self.find(b"-->")?;
            let value = self.input[start..end].to_string();
            self.pos = end + 3;
            // Comments outside the root element are not part of the tree
            if let Some((parent, _)) = self.stack.last_mut() {
                parent.children.push(Node::comment(value));
            }
        } else if self.starts_with(b"<![CDATA[") {
            let start = self.pos + 9;
            let end = self.find(b"]]>")?;
            let offset = self.pos;
            let text = self.input[start..end].to_string();
            self.pos = end + 3;
            self.append_text(Cow::Owned(text), offset)?;
        } else if self.starts_with(b"<?") {
            let end = self.find(b"?>")?;
            self.pos = end + 2;
        } else if self.starts_with(b"<!") {
            self.skip_declaration()?;
        } else if self.starts_with(b"</") {
            self.closing_tag()?;
        } else {
            self.opening_tag()?;
        }
        Ok(())
    }

    /// Skip `<!DOCTYPE ...>` including a bracketed internal subset
    fn skip_declaration(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        let mut i = self.pos + 2;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => {
                    self.pos = i + 1;
                    return Ok(());
                }
                _ => {}
            }
            i += 1;
        }
        self.pos = self.bytes.len();
        self.error(ParseErrorKind::UnexpectedEof)
    }

    fn closing_tag(&mut self) -> Result<(), ParseError> {
        let tag_start = self.pos;
        self.pos += 2;
        let name = self.name()?;
        self.skip_whitespace();
        self.expect(b'>')?;

        let Some((mut node, _)) = self.stack.pop() else {
            return Err(ParseError {
                offset: tag_start,
                kind: ParseErrorKind::UnexpectedClosingTag(name.to_string()),
            });
        };
        if node.name != name {
            return Err(ParseError {
                offset: tag_start,
                kind: ParseErrorKind::MismatchedTag {
                    expected: std::mem::take(&mut node.name),
                    found: name.to_string(),
                },
            });
        }
        self.attach(node, tag_start)
    }

    fn opening_tag(&mut self) -> Result<(), ParseError> {
        let tag_start = self.pos;
        self.pos += 1;
        let mut node = Node::element(self.name()?);

        loop {
            self.skip_whitespace();
            match self.bytes.get(self.pos) {
                None => return self.error(ParseErrorKind::UnexpectedEof),
                Some(b'/') => {
                    self.pos += 1;
                    self.expect(b'>')?;
                    return self.attach(node, tag_start);
                }
                Some(b'>') => {
                    self.pos += 1;
                    self.stack.push((node, tag_start));
                    return Ok(());
                }
                Some(_) => {
                    let attr_start = self.pos;
                    let attr = self.attribute()?;
                    if node.attributes.iter().any(|a| a.name == attr.name) {
                        return Err(ParseError {
                            offset: attr_start,
                            kind: ParseErrorKind::DuplicateAttribute(attr.name),
                        });
                    }
                    node.attributes.push(attr);
                }
            }
        }
    }

    fn attribute(&mut self) -> Result<Attribute, ParseError> {
        let name = self.name()?.to_string();
        self.skip_whitespace();
        self.expect(b'=')?;
        self.skip_whitespace();

        let quote = match self.bytes.get(self.pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            Some(_) => return self.unexpected(),
            None => return self.error(ParseErrorKind::UnexpectedEof),
        };
        self.pos += 1;
        let start = self.pos;
        let Some(rel) = memchr(quote, &self.bytes[start..]) else {
            self.pos = self.bytes.len();
            return self.error(ParseErrorKind::UnexpectedEof);
        };
        let end = start + rel;
        self.pos = end + 1;

        Ok(Attribute {
            name,
            value: decode_entities(&self.input[start..end]).into_owned(),
        })
    }

    fn text(&mut self, raw: &str, offset: usize) -> Result<(), ParseError> {
        if raw.bytes().all(|b| b.is_ascii_whitespace()) {
            return Ok(());
        }
        self.append_text(decode_entities(raw), offset)
    }

    /// Append text to the open element, merging with a preceding text node
    fn append_text(&mut self, text: Cow<'_, str>, offset: usize) -> Result<(), ParseError> {
        let Some((parent, _)) = self.stack.last_mut() else {
            return Err(ParseError {
                offset,
                kind: ParseErrorKind::TextOutsideRoot,
            });
        };
        match parent.children.last_mut() {
            Some(prev) if prev.kind == NodeKind::Text => prev.value.push_str(&text),
            _ => parent.children.push(Node::text(text.into_owned())),
        }
        Ok(())
    }

    fn attach(&mut self, node: Node, offset: usize) -> Result<(), ParseError> {
        if let Some((parent, _)) = self.stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        if self.root.is_some() {
            return Err(ParseError {
                offset,
                kind: ParseErrorKind::MultipleRoots,
            });
        }
        self.root = Some(node);
        Ok(())
    }

    fn name(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        match self.bytes.get(start) {
            Some(&b) if is_name_start_byte(b) => self.pos += 1,
            Some(_) => return self.error(ParseErrorKind::InvalidName),
            None => return self.error(ParseErrorKind::UnexpectedEof),
        }
        while self.pos < self.bytes.len() && is_name_byte(self.bytes[self.pos]) {
            self.pos += 1;
        }
        Ok(&self.input[start..self.pos])
    }

    fn expect(&mut self, byte: u8) -> Result<(), ParseError> {
        match self.bytes.get(self.pos) {
            Some(&b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => self.unexpected(),
            None => self.error(ParseErrorKind::UnexpectedEof),
        }
    }

    fn unexpected<T>(&self) -> Result<T, ParseError> {
        let c = self.input[self.pos..].chars().next().unwrap_or('\0');
        self.error(ParseErrorKind::UnexpectedChar(c))
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }
}

#[inline]
fn is_name_start_byte(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    is_name_start_byte(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Decode the predefined entities and numeric character references.
/// Unknown or malformed references are kept verbatim.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    while let Some(rel) = memchr(b'&', &bytes[pos..]) {
        let amp = pos + rel;
        out.push_str(&input[pos..amp]);
        // A reference ends at ';' and cannot contain another '&'
        let decoded = memchr2(b';', b'&', &bytes[amp + 1..])
            .filter(|&i| bytes[amp + 1 + i] == b';')
            .and_then(|i| decode_reference(&input[amp + 1..amp + 1 + i]).map(|c| (c, i)));
        match decoded {
            Some((c, len)) => {
                out.push(c);
                pos = amp + len + 2;
            }
            None => {
                out.push('&');
                pos = amp + 1;
            }
        }
    }
    out.push_str(&input[pos..]);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
