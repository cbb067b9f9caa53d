//! Document model: node tree, parser, path queries and the loaded variants

pub mod document;
pub mod node;
pub mod parser;
pub mod query;
