//! Per-variant view state
//!
//! Each document variant has its own tab. A tab remembers its query results,
//! node selection, scroll position and search, and keeps them while another
//! tab is shown. Switching tabs only changes which state is current.

use crate::model::document::DocumentVariant;
use crate::model::node::NodePath;
use crate::search::navigation::SearchState;
use crate::view::draw::Vec2;
use crate::view::jump::PendingJump;

/// View state of one document variant
#[derive(Debug, Clone, Default)]
pub struct TabState {
    pub scroll: Vec2,
    /// Query results, `None` until a query has run against this variant
    pub results: Option<Vec<NodePath>>,
    /// 0 shows every result, `i` shows only the i-th (1-based)
    pub selected_index: usize,
    /// Serialized size of the results
    pub result_bytes: usize,
    /// Time the last query took on this variant
    pub query_millis: u128,
    pub search: SearchState,
    pub jump: PendingJump,
}

impl TabState {
    pub fn result_count(&self) -> usize {
        self.results.as_ref().map_or(0, Vec::len)
    }

    /// Forget results and view state. Whether a search had been run is kept.
    pub fn clear_all(&mut self) {
        self.scroll = Vec2::ZERO;
        self.results = None;
        self.selected_index = 0;
        self.result_bytes = 0;
        self.query_millis = 0;
        self.search.clear_keep_searched();
        self.jump.cancel();
    }
}

/// One tab per variant, plus the current selection
#[derive(Debug, Clone, Default)]
pub struct TabSet {
    tabs: [TabState; 3],
    current: Option<DocumentVariant>,
}

impl TabSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_variant(&self) -> DocumentVariant {
        self.current.unwrap_or(DocumentVariant::Raw)
    }

    pub fn current(&self) -> &TabState {
        &self.tabs[self.current_variant().index()]
    }

    pub fn current_mut(&mut self) -> &mut TabState {
        &mut self.tabs[self.current_variant().index()]
    }

    pub fn get(&self, variant: DocumentVariant) -> &TabState {
        &self.tabs[variant.index()]
    }

    pub fn get_mut(&mut self, variant: DocumentVariant) -> &mut TabState {
        &mut self.tabs[variant.index()]
    }

    /// Make `variant` current; returns the previously current variant
    pub fn select(&mut self, variant: DocumentVariant) -> DocumentVariant {
        let previous = self.current_variant();
        self.current = Some(variant);
        previous
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TabState> {
        self.tabs.iter_mut()
    }

    pub fn clear_all(&mut self) {
        for tab in &mut self.tabs {
            tab.clear_all();
        }
    }

    /// Back to a fresh set, first tab current
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Human readable byte size: `"512 B"`, `"1.50 KB"`, `"2.00 MB"`, `"1.00 GB"`
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.2} KB", b / KB)
    } else if b < GB {
        format!("{:.2} MB", b / MB)
    } else {
        format!("{:.2} GB", b / GB)
    }
}
