//! View layer
//!
//! Formatting, measurement and rendering of the selected nodes. Everything
//! except `ui` is host independent and works in abstract units.

pub mod draw;
pub mod formatter;
pub mod gutter;
pub mod jump;
pub mod line_cache;
pub mod markers;
pub mod theme;
pub mod ui;
pub mod viewport;
