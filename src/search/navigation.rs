//! Per-tab search state and previous/next navigation

use crate::primitives::display_width::TextMetrics;
use crate::search::index::{self, MatchSpan};
use crate::view::jump::JumpTarget;
use crate::view::line_cache::LineCache;

/// Navigation direction through the match list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// The match to activate after moving one step from `active`.
///
/// With nothing active, `Next` picks the first match and `Previous` the last.
/// Otherwise the index wraps around. `None` when there are no matches.
pub fn step(active: Option<usize>, count: usize, direction: Direction) -> Option<usize> {
    if count == 0 {
        return None;
    }
    Some(match (active, direction) {
        (None, Direction::Next) => 0,
        (None, Direction::Previous) => count - 1,
        (Some(i), Direction::Next) => (i + 1) % count,
        (Some(i), Direction::Previous) => (i + count - 1) % count,
    })
}

/// What a navigation request did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationOutcome {
    /// The index was stale and has been rebuilt; nothing is active yet
    Reindexed,
    /// A match became active; scroll to it on the next render
    Jump(JumpTarget),
    /// No matches to move between
    NoMatches,
}

/// Search results for one tab
#[derive(Debug, Clone)]
pub struct SearchState {
    matches: Vec<MatchSpan>,
    active: Option<usize>,
    needs_reindex: bool,
    has_searched: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            matches: Vec::new(),
            active: None,
            needs_reindex: true,
            has_searched: false,
        }
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_match(&self) -> Option<&MatchSpan> {
        self.active.and_then(|i| self.matches.get(i))
    }

    pub fn needs_reindex(&self) -> bool {
        self.needs_reindex
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Mark the index stale, e.g. after the needle changed. Matches from the
    /// old index are dropped so they are never drawn; `has_searched` is kept.
    pub fn invalidate(&mut self) {
        self.matches.clear();
        self.active = None;
        self.needs_reindex = true;
    }

    /// Drop all matches and mark the index stale
    pub fn reset(&mut self) {
        self.matches.clear();
        self.active = None;
        self.has_searched = false;
        self.needs_reindex = true;
    }

    /// Like `reset`, but remembers whether a search had been run
    pub fn clear_keep_searched(&mut self) {
        let has_searched = self.has_searched;
        self.reset();
        self.has_searched = has_searched;
    }

    /// Rebuild the match list for `needle`. The old list and active index are
    /// replaced in one step; nothing is active afterwards.
    pub fn reindex(
        &mut self,
        lines: &LineCache,
        needle: &str,
        text_metrics: &dyn TextMetrics,
        code_left_pad: f32,
    ) {
        self.reset();
        self.needs_reindex = false;
        if needle.is_empty() {
            return;
        }
        self.has_searched = true;
        self.matches = index::build(lines, needle, text_metrics, code_left_pad);
        tracing::debug!(needle, matches = self.matches.len(), "search reindexed");
    }

    /// Move the active match one step in `direction`
    pub fn advance(&mut self, direction: Direction) -> NavigationOutcome {
        step(self.active, self.matches.len(), direction)
            .and_then(|index| self.activate(index))
            .map_or(NavigationOutcome::NoMatches, NavigationOutcome::Jump)
    }

    /// Make match `index` active and return where to scroll to show it
    pub fn activate(&mut self, index: usize) -> Option<JumpTarget> {
        let m = self.matches.get(index)?;
        self.active = Some(index);
        Some(JumpTarget {
            line: Some(m.line),
            x: Some(m.x),
        })
    }

    /// `"i / N"` while a match is active, `"N Result(s)"` after a search.
    /// Nothing while the index is stale.
    pub fn status_label(&self) -> Option<String> {
        if !self.has_searched || self.needs_reindex {
            return None;
        }
        Some(match self.active {
            Some(i) => format!("{} / {}", i + 1, self.matches.len()),
            None => format!("{} Result(s)", self.matches.len()),
        })
    }
}
