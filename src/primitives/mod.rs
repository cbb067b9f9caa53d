//! Low-level primitives and utilities
//!
//! This module contains text measurement and the styled line representation
//! shared by the formatter, search index and renderer.

pub mod display_width;
pub mod styled_text;
