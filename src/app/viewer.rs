//! The viewer session
//!
//! Ties the loaded documents, per-variant tabs and the shared code viewport
//! together and implements the user-facing operations: running a query,
//! choosing a node, switching variants, searching and drawing.
//!
//! Key concepts:
//! - **One viewport, many tabs**: the formatted lines always belong to the
//!   current tab. Switching tabs or changing the selection reformats them.
//! - **Stale searches** are rebuilt lazily. Typing only marks the index stale;
//!   the next navigation request rebuilds it without moving.
//! - **Reindex rule**: after a reformat the search is rebuilt right away when
//!   a search was active or the needle is empty.

use crate::app::tab::{format_size, TabSet};
use crate::config::Config;
use crate::export;
use crate::model::document::{DocumentSet, DocumentVariant};
use crate::model::node::Node;
use crate::model::query::{Query, QueryError};
use crate::primitives::display_width::{CellMetrics, TextMetrics};
use crate::search::navigation::{Direction, NavigationOutcome};
use crate::view::draw::{Rect, Vec2};
use crate::view::formatter::IndexHint;
use crate::view::theme::Theme;
use crate::view::viewport::{CodeViewport, RenderOutput, ViewportLayout};
use std::time::Instant;

/// What the viewport panel shows, checked in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    InvalidQuery,
    NoDocument,
    NoQuery,
    NoResults,
    /// Formatting produced no lines
    Empty,
    Ready,
}

impl ViewStatus {
    /// Message shown instead of the code, `None` when there is code to show
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::InvalidQuery => Some("Invalid query."),
            Self::NoDocument => Some("Selected document not available."),
            Self::NoQuery => Some("Enter a query and press Enter."),
            Self::NoResults => Some("No nodes found."),
            Self::Empty => Some("Error."),
            Self::Ready => None,
        }
    }
}

pub struct Viewer {
    documents: DocumentSet,
    tabs: TabSet,
    viewport: CodeViewport,
    text_metrics: Box<dyn TextMetrics>,
    needle: String,
    query: Option<String>,
    query_error: bool,
    /// Code area of the last render, used for paging
    last_code_rect: Rect,
}

impl Viewer {
    /// A viewer drawing into terminal cells
    pub fn new(documents: DocumentSet, config: &Config) -> Self {
        Self::with_metrics(documents, config, Box::new(CellMetrics))
    }

    pub fn with_metrics(
        documents: DocumentSet,
        config: &Config,
        text_metrics: Box<dyn TextMetrics>,
    ) -> Self {
        let viewport = CodeViewport::new(
            ViewportLayout::from_config(&config.viewer),
            Theme::from_config(&config.theme),
        )
        .with_heuristic_ratio(config.viewer.heuristic_ratio);
        Self {
            documents,
            tabs: TabSet::new(),
            viewport,
            text_metrics,
            needle: String::new(),
            query: None,
            query_error: false,
            last_code_rect: Rect::default(),
        }
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn tabs(&self) -> &TabSet {
        &self.tabs
    }

    pub fn viewport(&self) -> &CodeViewport {
        &self.viewport
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn current_variant(&self) -> DocumentVariant {
        self.tabs.current_variant()
    }

    /// Run `source` against every loaded variant.
    ///
    /// Every tab is cleared first and pending jumps are dropped. On a syntax
    /// error the viewer enters the invalid-query state until the next query.
    pub fn run_query(&mut self, source: &str) -> Result<(), QueryError> {
        self.query = Some(source.to_string());
        self.tabs.clear_all();

        let query = match Query::parse(source) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!(query = source, error = %e, "invalid query");
                self.query_error = true;
                self.viewport.clear();
                return Err(e);
            }
        };
        self.query_error = false;

        for variant in DocumentVariant::ALL {
            let Some(doc) = self.documents.get(variant) else {
                continue;
            };
            let started = Instant::now();
            let results = query.evaluate(doc.root());
            let tab = self.tabs.get_mut(variant);
            tab.query_millis = started.elapsed().as_millis();
            tab.result_bytes = results
                .iter()
                .filter_map(|path| doc.node(path))
                .map(Node::byte_size)
                .sum();
            tracing::info!(
                query = source,
                variant = variant.label(),
                results = results.len(),
                millis = tab.query_millis as u64,
                "query evaluated"
            );
            tab.results = Some(results);
        }

        self.reformat();
        self.tabs.current_mut().search.reset();
        Ok(())
    }

    /// Show all results (0) or only the `index`-th one (1-based), clamped to the result count
    pub fn set_selection(&mut self, index: usize) {
        let tab = self.tabs.current_mut();
        let index = index.min(tab.result_count());
        if index == tab.selected_index {
            return;
        }
        tab.selected_index = index;
        self.reformat();
        if self.search_active() {
            self.reindex();
        }
    }

    pub fn select_next_node(&mut self) {
        let next = self.tabs.current().selected_index + 1;
        self.set_selection(next);
    }

    pub fn select_previous_node(&mut self) {
        let previous = self.tabs.current().selected_index.saturating_sub(1);
        self.set_selection(previous);
    }

    /// Make `variant` current. Its lines are reformatted, and its search is
    /// rebuilt when the tab being left had searched or the needle is empty.
    pub fn switch_variant(&mut self, variant: DocumentVariant) {
        let previous = self.tabs.select(variant);
        if previous == variant {
            return;
        }
        let had_searched = self.tabs.get(previous).search.has_searched();
        tracing::debug!(from = previous.label(), to = variant.label(), "switch variant");
        self.reformat();
        if had_searched || self.needle.is_empty() {
            self.reindex();
        }
    }

    pub fn next_variant(&mut self) {
        self.switch_variant(self.current_variant().next());
    }

    /// Replace the search needle. Indexes are rebuilt on the next navigation.
    pub fn set_search_text(&mut self, needle: &str) {
        if self.needle == needle {
            return;
        }
        self.needle = needle.to_string();
        for tab in self.tabs.iter_mut() {
            tab.search.invalidate();
        }
    }

    pub fn find_next(&mut self) -> NavigationOutcome {
        self.find(Direction::Next)
    }

    pub fn find_previous(&mut self) -> NavigationOutcome {
        self.find(Direction::Previous)
    }

    /// A stale index is rebuilt and nothing moves; otherwise step and queue a jump
    fn find(&mut self, direction: Direction) -> NavigationOutcome {
        if self.tabs.current().search.needs_reindex() {
            self.reindex();
            return NavigationOutcome::Reindexed;
        }
        let tab = self.tabs.current_mut();
        let outcome = tab.search.advance(direction);
        if let NavigationOutcome::Jump(target) = outcome {
            tab.jump.queue(target);
        }
        outcome
    }

    /// Activate match `index` and scroll to it on the next draw
    pub fn queue_jump_to(&mut self, index: usize) -> bool {
        let tab = self.tabs.current_mut();
        match tab.search.activate(index) {
            Some(target) => {
                tab.jump.queue(target);
                true
            }
            None => false,
        }
    }

    /// Drop the current tab's matches; the next navigation reindexes
    pub fn reset_search(&mut self) {
        let tab = self.tabs.current_mut();
        tab.search.reset();
        tab.jump.cancel();
    }

    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        let scroll = &mut self.tabs.current_mut().scroll;
        scroll.x += dx;
        scroll.y += dy;
    }

    /// Scroll by one screen; positive pages down
    pub fn page(&mut self, pages: f32) {
        let height = self.last_code_rect.height.max(1.0);
        self.scroll_by(0.0, pages * height);
    }

    pub fn scroll_to_top(&mut self) {
        self.tabs.current_mut().scroll = Vec2::ZERO;
    }

    /// Clamped to the real bottom on the next draw
    pub fn scroll_to_bottom(&mut self) {
        self.tabs.current_mut().scroll.y = f32::MAX;
    }

    pub fn status(&self) -> ViewStatus {
        let tab = self.tabs.current();
        if self.query_error {
            ViewStatus::InvalidQuery
        } else if self.documents.get(self.current_variant()).is_none() {
            ViewStatus::NoDocument
        } else if tab.results.is_none() {
            ViewStatus::NoQuery
        } else if tab.result_count() == 0 {
            ViewStatus::NoResults
        } else if self.viewport.lines().is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Ready
        }
    }

    /// Render the current tab into `area`. A pending jump is consumed even
    /// when only a message is shown.
    pub fn draw(&mut self, area: Rect) -> RenderOutput {
        let status = self.status();
        let tab = self.tabs.current_mut();
        let jump = tab.jump.take();
        let output = match status.message() {
            Some(message) => self.viewport.draw_message(area, message),
            None => self.viewport.draw(
                area,
                &mut tab.scroll,
                jump,
                &tab.search,
                self.text_metrics.as_ref(),
            ),
        };
        self.last_code_rect = output.code_rect;
        output
    }

    /// Tab title: variant name with the result size, or the document size
    /// before any query ran
    pub fn tab_label(&self, variant: DocumentVariant) -> String {
        let Some(doc) = self.documents.get(variant) else {
            return variant.label().to_string();
        };
        let tab = self.tabs.get(variant);
        let bytes = if tab.results.is_some() {
            tab.result_bytes
        } else {
            doc.total_bytes
        };
        format!("{} ({})", variant.label(), format_size(bytes))
    }

    /// `"All (N)"` or `"i / N"` for the node selection, once a query has results
    pub fn selection_label(&self) -> Option<String> {
        let tab = self.tabs.current();
        let count = tab.result_count();
        if count == 0 {
            return None;
        }
        Some(match tab.selected_index {
            0 => format!("All ({count})"),
            i => format!("{i} / {count}"),
        })
    }

    pub fn search_label(&self) -> Option<String> {
        self.tabs.current().search.status_label()
    }

    /// The shown lines as a standalone XML document
    pub fn export_text(&self) -> String {
        export::document_text(self.viewport.lines().lines())
    }

    /// The shown lines as color markup
    pub fn markup_text(&self) -> String {
        export::markup(self.viewport.lines().lines(), self.viewport.theme())
    }

    /// Forget all view state; loaded documents are kept
    pub fn close(&mut self) {
        self.tabs.reset();
        self.viewport.clear();
        self.needle.clear();
        self.query = None;
        self.query_error = false;
        self.last_code_rect = Rect::default();
    }

    fn search_active(&self) -> bool {
        self.tabs.current().search.has_searched() || self.needle.is_empty()
    }

    fn reindex(&mut self) {
        let tab = self.tabs.current_mut();
        self.viewport
            .reindex(&mut tab.search, &self.needle, self.text_metrics.as_ref());
    }

    /// Format the current tab's selection into the viewport
    fn reformat(&mut self) {
        let variant = self.tabs.current_variant();
        let tab = self.tabs.current_mut();
        tab.search.invalidate();

        let (Some(doc), Some(results)) = (self.documents.get(variant), tab.results.as_ref()) else {
            self.viewport.clear();
            return;
        };

        let (nodes, hint): (Vec<&Node>, _) = match tab.selected_index {
            0 => (results.iter().filter_map(|path| doc.node(path)).collect(), None),
            i => (
                results
                    .get(i - 1)
                    .and_then(|path| doc.node(path))
                    .into_iter()
                    .collect(),
                Some(IndexHint {
                    index: i,
                    total: results.len(),
                }),
            ),
        };
        self.viewport
            .set_nodes(&nodes, hint, self.text_metrics.as_ref());
        tracing::debug!(
            variant = variant.label(),
            nodes = nodes.len(),
            lines = self.viewport.lines().len(),
            "reformatted"
        );
    }
}
