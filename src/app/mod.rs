//! The interactive viewer application
//!
//! `Viewer` holds the session state and operations; `App` wraps it with the
//! keyboard input modes and terminal rendering.

#[cfg(feature = "runtime")]
mod input;
mod render;
pub mod tab;
pub mod viewer;

pub use viewer::{ViewStatus, Viewer};

/// What keystrokes are currently editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a path query, run on Enter
    Query,
    /// Typing the search needle
    Search,
}

impl InputMode {
    pub fn prompt_label(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Query => Some("Query"),
            Self::Search => Some("Search"),
        }
    }
}

pub struct App {
    viewer: Viewer,
    mode: InputMode,
    /// Text of the prompt being edited
    input: String,
    /// One-shot message for the status bar, e.g. a query syntax error
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            mode: InputMode::Normal,
            input: String::new(),
            notice: None,
            should_quit: false,
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Run a query and remember its error for the status bar
    pub fn submit_query(&mut self, source: &str) {
        self.notice = match self.viewer.run_query(source) {
            Ok(()) => None,
            Err(e) => Some(e.to_string()),
        };
    }
}
