//! Path queries over a parsed document
//!
//! A small subset of XPath location paths, enough to pick node sets out of
//! large definition files:
//!
//! - `/Defs/ThingDef` child steps from the document node
//! - `//ThingDef` descendant steps
//! - `*`, `text()`, `comment()` and `node()` node tests
//! - predicates `[2]`, `[@Name]`, `[@Name='Wall']`, `[defName="Wall"]`
//!
//! A path without a leading slash is evaluated from the document node too,
//! so `Defs/ThingDef` and `/Defs/ThingDef` are the same query.
//! Results are node paths in document order without duplicates.

use crate::model::node::{Node, NodeKind, NodePath};
use std::fmt;

/// A query that failed to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The query is empty or only whitespace
    Empty,
    /// The query ended in the middle of a step or predicate
    UnexpectedEnd,
    /// A character that cannot appear at this position
    UnexpectedChar { offset: usize, found: char },
    /// `[0]` or a position that does not fit in memory
    InvalidPosition(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty query"),
            Self::UnexpectedEnd => write!(f, "unexpected end of query"),
            Self::UnexpectedChar { offset, found } => {
                write!(f, "unexpected {found:?} at position {offset}")
            }
            Self::InvalidPosition(s) => write!(f, "invalid position predicate [{s}]"),
        }
    }
}

impl std::error::Error for QueryError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeTest {
    Name(String),
    AnyElement,
    Text,
    Comment,
    AnyNode,
}

impl NodeTest {
    fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Name(name) => node.kind == NodeKind::Element && node.name == *name,
            Self::AnyElement => node.kind == NodeKind::Element,
            Self::Text => node.kind == NodeKind::Text,
            Self::Comment => node.kind == NodeKind::Comment,
            Self::AnyNode => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    /// 1-based position among the step's candidates for one parent
    Position(usize),
    HasAttribute(String),
    AttributeEquals(String, String),
    ChildTextEquals(String, String),
}

impl Predicate {
    fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Position(_) => true,
            Self::HasAttribute(name) => node.attribute(name).is_some(),
            Self::AttributeEquals(name, value) => node.attribute(name) == Some(value.as_str()),
            Self::ChildTextEquals(name, value) => node
                .children
                .iter()
                .any(|c| c.kind == NodeKind::Element && c.name == *name && c.inner_text() == *value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NodeTest,
    predicates: Vec<Predicate>,
}

/// A compiled path query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    steps: Vec<Step>,
}

/// Evaluation context: the document node or a node inside the tree
#[derive(Clone)]
enum Context<'a> {
    Document(&'a Node),
    Node(&'a Node, NodePath),
}

impl<'a> Context<'a> {
    /// Children paired with their paths. The document node's only child is the root element.
    fn children(&self) -> Vec<(&'a Node, NodePath)> {
        match self {
            Self::Document(root) => vec![(*root, NodePath(vec![0]))],
            Self::Node(node, path) => node
                .children
                .iter()
                .enumerate()
                .map(|(i, child)| (child, path.child(i)))
                .collect(),
        }
    }
}

impl Query {
    pub fn parse(source: &str) -> Result<Self, QueryError> {
        QueryParser::new(source).parse()
    }

    /// Evaluate against a document whose root element is `root`
    pub fn evaluate(&self, root: &Node) -> Vec<NodePath> {
        let mut contexts = vec![Context::Document(root)];

        for step in &self.steps {
            let scopes = match step.axis {
                Axis::Child => contexts,
                Axis::Descendant => descendants_or_self(contexts),
            };

            let mut next: Vec<(&Node, NodePath)> = Vec::new();
            for scope in &scopes {
                let mut candidates: Vec<(&Node, NodePath)> = scope
                    .children()
                    .into_iter()
                    .filter(|(node, _)| step.test.matches(node))
                    .collect();
                for predicate in &step.predicates {
                    candidates = match predicate {
                        Predicate::Position(n) => candidates.into_iter().nth(n - 1).into_iter().collect(),
                        other => candidates
                            .into_iter()
                            .filter(|(node, _)| other.matches(node))
                            .collect(),
                    };
                }
                next.extend(candidates);
            }

            next.sort_by(|a, b| a.1.cmp(&b.1));
            next.dedup_by(|a, b| a.1 == b.1);
            contexts = next
                .into_iter()
                .map(|(node, path)| Context::Node(node, path))
                .collect();
        }

        contexts
            .into_iter()
            .filter_map(|ctx| match ctx {
                Context::Node(_, path) => Some(path),
                Context::Document(_) => None,
            })
            .collect()
    }
}

/// Every context plus all of its element descendants, in document order
fn descendants_or_self(contexts: Vec<Context<'_>>) -> Vec<Context<'_>> {
    let mut out = Vec::new();
    for ctx in contexts {
        let mut stack = vec![ctx];
        while let Some(current) = stack.pop() {
            let children = current.children();
            out.push(current);
            for (node, path) in children.into_iter().rev() {
                if node.is_element() {
                    stack.push(Context::Node(node, path));
                }
            }
        }
    }
    out
}

/// Resolve a node path against a document root element
pub fn resolve<'a>(root: &'a Node, path: &NodePath) -> Option<&'a Node> {
    let (first, rest) = path.0.split_first()?;
    if *first != 0 {
        return None;
    }
    rest.iter()
        .try_fold(root, |node, &i| node.children.get(i as usize))
}

struct QueryParser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> QueryParser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn parse(mut self) -> Result<Query, QueryError> {
        self.skip_whitespace();
        if self.pos == self.source.len() {
            return Err(QueryError::Empty);
        }

        let mut steps = Vec::new();
        let mut axis = if self.eat("//") {
            Axis::Descendant
        } else {
            self.eat("/");
            Axis::Child
        };

        loop {
            steps.push(self.step(axis)?);
            self.skip_whitespace();
            if self.pos == self.source.len() {
                break;
            }
            axis = if self.eat("//") {
                Axis::Descendant
            } else if self.eat("/") {
                Axis::Child
            } else {
                return Err(self.unexpected());
            };
        }

        Ok(Query { steps })
    }

    fn step(&mut self, axis: Axis) -> Result<Step, QueryError> {
        self.skip_whitespace();
        let test = if self.eat("*") {
            NodeTest::AnyElement
        } else {
            let name = self.name()?;
            if self.eat("(") {
                self.skip_whitespace();
                self.expect(")")?;
                match name {
                    "text" => NodeTest::Text,
                    "comment" => NodeTest::Comment,
                    "node" => NodeTest::AnyNode,
                    _ => {
                        return Err(QueryError::UnexpectedChar {
                            offset: self.pos - 1,
                            found: ')',
                        })
                    }
                }
            } else {
                NodeTest::Name(name.to_string())
            }
        };

        let mut predicates = Vec::new();
        loop {
            self.skip_whitespace();
            if !self.eat("[") {
                break;
            }
            predicates.push(self.predicate()?);
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn predicate(&mut self) -> Result<Predicate, QueryError> {
        self.skip_whitespace();
        let predicate = match self.peek() {
            None => return Err(QueryError::UnexpectedEnd),
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
                let digits = &self.source[start..self.pos];
                match digits.parse::<usize>() {
                    Ok(n) if n > 0 => Predicate::Position(n),
                    _ => return Err(QueryError::InvalidPosition(digits.to_string())),
                }
            }
            Some('@') => {
                self.pos += 1;
                let name = self.name()?.to_string();
                self.skip_whitespace();
                if self.eat("=") {
                    Predicate::AttributeEquals(name, self.literal()?)
                } else {
                    Predicate::HasAttribute(name)
                }
            }
            Some(_) => {
                let name = self.name()?.to_string();
                self.skip_whitespace();
                self.expect("=")?;
                Predicate::ChildTextEquals(name, self.literal()?)
            }
        };
        self.skip_whitespace();
        self.expect("]")?;
        Ok(predicate)
    }

    fn literal(&mut self) -> Result<String, QueryError> {
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return Err(self.unexpected()),
            None => return Err(QueryError::UnexpectedEnd),
        };
        self.pos += 1;
        let rest = &self.source[self.pos..];
        let end = rest.find(quote).ok_or(QueryError::UnexpectedEnd)?;
        let value = rest[..end].to_string();
        self.pos += end + 1;
        Ok(value)
    }

    fn name(&mut self) -> Result<&'a str, QueryError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {}
            Some(_) => return Err(self.unexpected()),
            None => return Err(QueryError::UnexpectedEnd),
        }
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':') {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        Ok(&self.source[start..self.pos])
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.source[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), QueryError> {
        if self.eat(token) {
            Ok(())
        } else if self.pos == self.source.len() {
            Err(QueryError::UnexpectedEnd)
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> QueryError {
        match self.peek() {
            Some(found) => QueryError::UnexpectedChar {
                offset: self.pos,
                found,
            },
            None => QueryError::UnexpectedEnd,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }
}
