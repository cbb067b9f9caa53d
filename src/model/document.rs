//! The three document variants a viewer session works with
//!
//! Key concepts:
//! - **Raw**: the combined definitions before any patch operations ran
//! - **Patched**: after patch operations were applied
//! - **Resolved**: after inheritance was resolved
//!
//! Each variant is optional; a session may only have captured some of them.

use crate::model::node::{Node, NodePath};
use crate::model::parser::{self, Document, ParseError};
use crate::model::query;
use std::fmt;
use std::path::Path;

/// Which stage of the load pipeline a document was captured at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentVariant {
    Raw,
    Patched,
    Resolved,
}

impl DocumentVariant {
    pub const ALL: [DocumentVariant; 3] = [Self::Raw, Self::Patched, Self::Resolved];

    /// Position in `ALL`
    pub fn index(self) -> usize {
        match self {
            Self::Raw => 0,
            Self::Patched => 1,
            Self::Resolved => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::Patched => "Patched",
            Self::Resolved => "Resolved",
        }
    }

    /// Next variant, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Error loading a document from disk
#[derive(Debug)]
pub enum LoadError {
    IoError(String),
    ParseError(ParseError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::ParseError(err) => write!(f, "Parse error: {err}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<ParseError> for LoadError {
    fn from(err: ParseError) -> Self {
        Self::ParseError(err)
    }
}

/// A parsed document with its serialized size
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    /// UTF-8 size of the serialized root element
    pub total_bytes: usize,
}

impl LoadedDocument {
    pub fn new(document: Document) -> Self {
        let total_bytes = document.root.byte_size();
        Self {
            document,
            total_bytes,
        }
    }

    pub fn root(&self) -> &Node {
        &self.document.root
    }

    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        query::resolve(&self.document.root, path)
    }
}

/// Up to one document per variant
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    slots: [Option<LoadedDocument>; 3],
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variant: DocumentVariant, document: Document) {
        let loaded = LoadedDocument::new(document);
        tracing::info!(
            variant = variant.label(),
            bytes = loaded.total_bytes,
            "document loaded"
        );
        self.slots[variant.index()] = Some(loaded);
    }

    /// Parse `source` and store it under `variant`
    pub fn insert_str(&mut self, variant: DocumentVariant, source: &str) -> Result<(), LoadError> {
        let document = parser::parse(source)?;
        self.insert(variant, document);
        Ok(())
    }

    /// Read and parse a file into the `variant` slot
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        variant: DocumentVariant,
        path: P,
    ) -> Result<(), LoadError> {
        let source = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LoadError::IoError(format!("{}: {e}", path.as_ref().display())))?;
        self.insert_str(variant, &source)
    }

    pub fn get(&self, variant: DocumentVariant) -> Option<&LoadedDocument> {
        self.slots[variant.index()].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}
