use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use std::io;
use tempfile::TempDir;
use xmlview::app::{App, Viewer};
use xmlview::config::Config;
use xmlview::model::document::{DocumentSet, DocumentVariant};

/// Drives an `App` against a virtual terminal
pub struct ViewerTestHarness {
    /// The application instance
    app: App,

    /// Virtual terminal backend
    terminal: Terminal<TestBackend>,

    /// Holds the document files for the duration of the test
    _temp_dir: Option<TempDir>,
}

impl ViewerTestHarness {
    /// Create a harness with no documents loaded
    pub fn new(width: u16, height: u16) -> io::Result<Self> {
        Self::with_config(width, height, Config::default(), DocumentSet::new(), None)
    }

    /// Create a harness with the given documents, written to temp files and loaded from disk
    pub fn with_documents(
        width: u16,
        height: u16,
        documents: &[(DocumentVariant, &str)],
    ) -> io::Result<Self> {
        Self::with_documents_and_config(width, height, documents, Config::default())
    }

    pub fn with_documents_and_config(
        width: u16,
        height: u16,
        documents: &[(DocumentVariant, &str)],
        config: Config,
    ) -> io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let mut set = DocumentSet::new();
        for (variant, source) in documents {
            let path = temp_dir.path().join(format!("{}.xml", variant.label()));
            std::fs::write(&path, source)?;
            set.load_file(*variant, &path)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        }
        Self::with_config(width, height, config, set, Some(temp_dir))
    }

    fn with_config(
        width: u16,
        height: u16,
        config: Config,
        documents: DocumentSet,
        temp_dir: Option<TempDir>,
    ) -> io::Result<Self> {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend)?;
        let app = App::new(Viewer::new(documents, &config));

        let mut harness = ViewerTestHarness {
            app,
            terminal,
            _temp_dir: temp_dir,
        };
        harness.render()?;
        Ok(harness)
    }

    /// Simulate a key press and render
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> io::Result<()> {
        self.app.handle_key(code, modifiers);
        self.render()
    }

    /// Send the same key press multiple times, rendering once at the end
    pub fn send_key_repeat(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        count: usize,
    ) -> io::Result<()> {
        for _ in 0..count {
            self.app.handle_key(code, modifiers);
        }
        self.render()
    }

    /// Simulate typing a string of text, rendering once at the end
    pub fn type_text(&mut self, text: &str) -> io::Result<()> {
        for ch in text.chars() {
            self.app.handle_key(KeyCode::Char(ch), KeyModifiers::NONE);
        }
        self.render()
    }

    /// Open the query prompt, replace its text with `query` and run it
    pub fn run_query(&mut self, query: &str) -> io::Result<()> {
        self.send_key(KeyCode::Char(':'), KeyModifiers::NONE)?;
        self.clear_prompt()?;
        self.type_text(query)?;
        self.send_key(KeyCode::Enter, KeyModifiers::NONE)
    }

    /// Open the search prompt, replace its text with `needle` and confirm it
    pub fn search(&mut self, needle: &str) -> io::Result<()> {
        self.send_key(KeyCode::Char('/'), KeyModifiers::NONE)?;
        self.clear_prompt()?;
        self.type_text(needle)?;
        self.send_key(KeyCode::Enter, KeyModifiers::NONE)
    }

    /// Erase the text of the open prompt
    pub fn clear_prompt(&mut self) -> io::Result<()> {
        let count = self.app.input().chars().count();
        self.send_key_repeat(KeyCode::Backspace, KeyModifiers::NONE, count)
    }

    pub fn render(&mut self) -> io::Result<()> {
        self.terminal.draw(|frame| {
            self.app.render(frame);
        })?;
        Ok(())
    }

    pub fn buffer(&self) -> &ratatui::buffer::Buffer {
        self.terminal.backend().buffer()
    }

    /// Get text at specific cell position
    pub fn get_cell(&self, x: u16, y: u16) -> Option<String> {
        self.buffer().cell((x, y)).map(|cell| cell.symbol().to_string())
    }

    /// Get the style (color, modifiers) of a specific cell
    pub fn get_cell_style(&self, x: u16, y: u16) -> Option<ratatui::style::Style> {
        self.buffer().cell((x, y)).map(|cell| cell.style())
    }

    /// Get the text content of a specific screen row
    pub fn get_row_text(&self, y: u16) -> String {
        let buffer = self.buffer();
        (0..buffer.area.width)
            .filter_map(|x| buffer.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect()
    }

    /// First row whose text contains `text`
    pub fn find_row(&self, text: &str) -> Option<u16> {
        (0..self.buffer().area.height).find(|&y| self.get_row_text(y).contains(text))
    }

    /// Get entire screen as string (for debugging)
    pub fn screen_to_string(&self) -> String {
        let height = self.buffer().area.height;
        (0..height)
            .map(|y| self.get_row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Verify text appears on screen
    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain '{text}'\nScreen content:\n{screen}"
        );
    }

    /// Verify text does not appear on screen
    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen to not contain '{text}'\nScreen content:\n{screen}"
        );
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn viewer(&self) -> &Viewer {
        self.app.viewer()
    }

    pub fn should_quit(&self) -> bool {
        self.app.should_quit()
    }
}
