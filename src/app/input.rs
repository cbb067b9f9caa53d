use super::{App, InputMode};
use crate::model::document::DocumentVariant;
use crossterm::event::{KeyCode, KeyModifiers};

/// Columns moved by one horizontal scroll step
const HORIZONTAL_STEP: f32 = 4.0;

impl App {
    /// Handle one key press. Used by both the binary and the tests.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        tracing::trace!(?code, ?modifiers, mode = ?self.mode, "handle_key");

        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.mode {
            InputMode::Normal => self.handle_normal_key(code),
            InputMode::Query | InputMode::Search => self.handle_prompt_key(code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        let viewer = &mut self.viewer;
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => {
                self.input = viewer.needle().to_string();
                self.mode = InputMode::Search;
            }
            KeyCode::Char(':') => {
                self.input = viewer.query().unwrap_or_default().to_string();
                self.mode = InputMode::Query;
            }
            KeyCode::Enter | KeyCode::Char('n') => {
                viewer.find_next();
            }
            KeyCode::Char('N') => {
                viewer.find_previous();
            }
            KeyCode::Esc => viewer.reset_search(),
            KeyCode::Tab => viewer.next_variant(),
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                if let Some(variant) = DocumentVariant::from_index(index) {
                    viewer.switch_variant(variant);
                }
            }
            KeyCode::Char('[') => viewer.select_previous_node(),
            KeyCode::Char(']') => viewer.select_next_node(),
            KeyCode::Up | KeyCode::Char('k') => viewer.scroll_by(0.0, -1.0),
            KeyCode::Down | KeyCode::Char('j') => viewer.scroll_by(0.0, 1.0),
            KeyCode::Left | KeyCode::Char('h') => viewer.scroll_by(-HORIZONTAL_STEP, 0.0),
            KeyCode::Right | KeyCode::Char('l') => viewer.scroll_by(HORIZONTAL_STEP, 0.0),
            KeyCode::PageUp => viewer.page(-1.0),
            KeyCode::PageDown => viewer.page(1.0),
            KeyCode::Home => viewer.scroll_to_top(),
            KeyCode::End => viewer.scroll_to_bottom(),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.input.push(c);
                self.prompt_edited();
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.prompt_edited();
            }
            KeyCode::Enter => {
                let mode = std::mem::take(&mut self.mode);
                let input = std::mem::take(&mut self.input);
                match mode {
                    InputMode::Query => self.submit_query(&input),
                    InputMode::Search => {
                        self.viewer.set_search_text(&input);
                        self.viewer.find_next();
                    }
                    InputMode::Normal => {}
                }
            }
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.input.clear();
            }
            _ => {}
        }
    }

    /// Searching follows the prompt as it is typed; queries run only on Enter
    fn prompt_edited(&mut self) {
        if self.mode == InputMode::Search {
            self.viewer.set_search_text(&self.input);
        }
    }
}
