//! XML node tree
//!
//! Nodes own their children directly. A node inside a loaded document is
//! addressed by a `NodePath`: the child index at every level from the
//! document's top-level node list down to the node.

use std::fmt::{self, Write as _};

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Element node
    Element,
    /// Text content (CDATA sections are folded into text)
    Text,
    /// Comment
    Comment,
}

/// A `name="value"` pair on an element. Values are stored decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An XML node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Element name; empty for text and comments
    pub name: String,
    /// Text or comment content; empty for elements
    pub value: String,
    /// Attributes in document order (elements only)
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order (elements only)
    pub children: Vec<Node>,
}

impl Node {
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element,
            name: name.into(),
            value: String::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            name: String::new(),
            value: value.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn comment(value: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Comment,
            name: String::new(),
            value: value.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: append an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Builder: append a child node
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append a text child
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// The text of the only child, if the element has exactly one child and it is text
    pub fn single_text_child(&self) -> Option<&str> {
        match self.children.as_slice() {
            [only] if only.kind == NodeKind::Text => Some(&only.value),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn inner_text(&self) -> String {
        match self.kind {
            NodeKind::Text => self.value.clone(),
            NodeKind::Comment => String::new(),
            NodeKind::Element => self
                .walk()
                .filter_map(|(visit, _)| match visit {
                    Visit::Enter(node) if node.kind == NodeKind::Text => Some(node.value.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Plain XML serialization of this node and its subtree
    pub fn outer_xml(&self) -> String {
        let mut out = String::new();
        let _ = write_xml(self, None, &mut out);
        out
    }

    /// UTF-8 byte count of the serialized node, counted without building it
    pub fn byte_size(&self) -> usize {
        let mut count = ByteCount(0);
        let _ = write_xml(self, None, &mut count);
        count.0
    }

    /// Depth-first walk over this node and its subtree in document order.
    /// Uses an explicit stack, so depth never grows the call stack.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: Vec::new(),
            start: Some(self),
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // Unlink descendants first so dropping a deep tree does not recurse
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// One step of a `Walk`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit<'a> {
    Enter(&'a Node),
    /// After all children of the node were visited
    Leave(&'a Node),
}

/// Iterator returned by `Node::walk`, yielding each visit with its depth
/// below the starting node
pub struct Walk<'a> {
    /// Open nodes with the index of the next child to visit
    stack: Vec<(&'a Node, usize)>,
    start: Option<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (Visit<'a>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(node) = self.start.take() {
            self.stack.push((node, 0));
            return Some((Visit::Enter(node), 0));
        }

        let depth = self.stack.len().checked_sub(1)?;
        let (node, next_child) = self.stack.last_mut()?;
        let node: &'a Node = *node;
        match node.children.get(*next_child) {
            Some(child) => {
                *next_child += 1;
                self.stack.push((child, 0));
                Some((Visit::Enter(child), depth + 1))
            }
            None => {
                self.stack.pop();
                Some((Visit::Leave(node), depth))
            }
        }
    }
}

struct ByteCount(usize);

impl fmt::Write for ByteCount {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

/// Serialize `node` and its subtree.
///
/// With `indent`, elements and comments start on their own line, indented one
/// unit per level, and an element whose only child is text stays on one line.
/// Without it the output is compact.
pub fn write_xml<W: fmt::Write>(node: &Node, indent: Option<&str>, out: &mut W) -> fmt::Result {
    // Depth of the element currently printed on a single line
    let mut inline: Option<usize> = None;
    let mut started = false;

    for (visit, depth) in node.walk() {
        let in_line = inline.is_some_and(|d| depth > d);
        match visit {
            Visit::Enter(node) => {
                if let Some(unit) = indent {
                    if started && !in_line {
                        out.write_char('\n')?;
                        for _ in 0..depth {
                            out.write_str(unit)?;
                        }
                    }
                }
                started = true;
                match node.kind {
                    NodeKind::Text => escape_into(&node.value, false, out)?,
                    NodeKind::Comment => write!(out, "<!--{}-->", node.value)?,
                    NodeKind::Element => {
                        out.write_char('<')?;
                        out.write_str(&node.name)?;
                        for attr in &node.attributes {
                            write!(out, " {}=\"", attr.name)?;
                            escape_into(&attr.value, true, out)?;
                            out.write_char('"')?;
                        }
                        if node.children.is_empty() {
                            out.write_str(" />")?;
                        } else {
                            out.write_char('>')?;
                            if !in_line && node.single_text_child().is_some() {
                                inline = Some(depth);
                            }
                        }
                    }
                }
            }
            Visit::Leave(node) => {
                if node.kind != NodeKind::Element || node.children.is_empty() {
                    continue;
                }
                if inline == Some(depth) {
                    inline = None;
                } else if let Some(unit) = indent {
                    if !in_line {
                        out.write_char('\n')?;
                        for _ in 0..depth {
                            out.write_str(unit)?;
                        }
                    }
                }
                write!(out, "</{}>", node.name)?;
            }
        }
    }
    Ok(())
}

fn escape_into<W: fmt::Write>(s: &str, in_attribute: bool, out: &mut W) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' if in_attribute => out.write_str("&quot;")?,
            _ => out.write_char(c)?,
        }
    }
    Ok(())
}

/// Address of a node within a document: child indices from the top level down
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodePath(pub Vec<u32>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index as u32);
        Self(indices)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}
