//! Terminal rendering
//!
//! - `painter` - paints viewport draw commands into a ratatui buffer
//! - `chrome` - tab bar and status bar

pub mod chrome;
pub mod painter;

pub use chrome::{StatusBarRenderer, StatusLine, TabBarRenderer, TabEntry};
pub use painter::CommandsWidget;
