use tracing::debug;

use crate::candidate_source::{ranked_results, RetrievalLimits};
use crate::config::Config;
use crate::contract::RenderFrame;
use crate::gateway::{FilesystemGateway, OpenWith};
use crate::input_buffer::InputBuffer;
use crate::keys::{Key, KeyEvent, KeyParseError};
use crate::mode::Mode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Create `path` if missing, open it, close the session.
    Submit { path: String, with: OpenWith },
    /// Move `path` to the trash, close the session.
    Trash { path: String },
    /// Close the session without touching the filesystem.
    Cancel,
}

/// Outcome of interpreting one key, before any retrieval happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    /// Text or mode changed, so candidates must be recomputed.
    pub buffer_changed: bool,
    pub action: Option<SessionAction>,
}

impl EditResult {
    fn unchanged() -> Self {
        Self {
            buffer_changed: false,
            action: None,
        }
    }

    fn changed(buffer_changed: bool) -> Self {
        Self {
            buffer_changed,
            action: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub limits: RetrievalLimits,
    pub fuzzy_trigger: KeyEvent,
}

impl Default for SessionSettings {
    fn default() -> Self {
        let config = Config::default();
        Self {
            limits: config.retrieval_limits(),
            fuzzy_trigger: crate::config::default_fuzzy_trigger(),
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Result<Self, KeyParseError> {
        Ok(Self {
            limits: config.retrieval_limits(),
            fuzzy_trigger: KeyEvent::parse(&config.fuzzy_trigger)?,
        })
    }
}

/// One search session: the input, the mode, and the ranked results with the
/// current selection.
#[derive(Debug, Clone)]
pub struct SessionState {
    buffer: InputBuffer,
    mode: Mode,
    results: Vec<String>,
    selected_index: usize,
    settings: SessionSettings,
}

impl SessionState {
    /// A session seeded with `initial_text` and its first result set.
    pub fn open(
        gateway: &dyn FilesystemGateway,
        initial_text: &str,
        settings: SessionSettings,
    ) -> Self {
        let mut session = Self {
            buffer: InputBuffer::new(initial_text),
            mode: Mode::Normal,
            results: Vec::new(),
            selected_index: 0,
            settings,
        };
        session.refresh(gateway);
        session
    }

    pub fn input_text(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected(&self) -> Option<&str> {
        self.results.get(self.selected_index).map(String::as_str)
    }

    pub fn frame(&self) -> RenderFrame {
        RenderFrame {
            input_text: self.buffer.as_str().to_string(),
            base_length: self.mode.base_length(self.buffer.as_str()),
            results: self.results.clone(),
            selected_index: self.selected_index,
            fuzzy: self.mode.is_fuzzy(),
        }
    }

    /// Interprets `event`, then recomputes candidates if the edit changed
    /// anything. Returns the action the caller should carry out, if any.
    pub fn handle_key(
        &mut self,
        gateway: &dyn FilesystemGateway,
        event: &KeyEvent,
    ) -> Option<SessionAction> {
        let edit = self.interpret(event);
        if edit.buffer_changed {
            self.refresh(gateway);
        }
        edit.action
    }

    /// Applies the editing side of `event` without touching the filesystem.
    pub fn interpret(&mut self, event: &KeyEvent) -> EditResult {
        if self.settings.fuzzy_trigger.matches(event) {
            self.toggle_fuzzy();
            return EditResult::changed(true);
        }

        let modifiers = event.modifiers;
        let mut edit = match event.key {
            Key::Up => {
                self.move_selection(-1);
                EditResult::unchanged()
            }
            Key::Down => {
                self.move_selection(1);
                EditResult::unchanged()
            }
            Key::Tab => {
                let completed = self.complete_selection();
                let exited = self.exit_fuzzy();
                EditResult::changed(completed || exited)
            }
            Key::Enter => {
                let completed = self.complete_selection();
                let trimmed = self.buffer.trim_trailing_whitespace();
                let with = if modifiers.is_terminal() {
                    OpenWith::Terminal
                } else {
                    OpenWith::Default
                };
                EditResult {
                    buffer_changed: completed || trimmed,
                    action: Some(SessionAction::Submit {
                        path: self.buffer.as_str().to_string(),
                        with,
                    }),
                }
            }
            Key::Escape => EditResult {
                buffer_changed: false,
                action: Some(SessionAction::Cancel),
            },
            Key::Delete => {
                let completed = self.complete_selection();
                EditResult {
                    buffer_changed: completed,
                    action: Some(SessionAction::Trash {
                        path: self.buffer.as_str().to_string(),
                    }),
                }
            }
            Key::Backspace => {
                let changed = if modifiers.is_clear() {
                    self.buffer.delete_all()
                } else if modifiers.is_word() {
                    self.buffer.delete_back_word()
                } else {
                    self.buffer.delete_back_plain()
                };
                EditResult::changed(changed)
            }
            Key::Char(c) => {
                if modifiers.ctrl || modifiers.meta {
                    EditResult::unchanged()
                } else {
                    EditResult::changed(self.buffer.append_char(c))
                }
            }
        };

        if self.buffer.reseed_if_empty() {
            edit.buffer_changed = true;
        }
        edit
    }

    /// Drops a stale fuzzy root, then retrieves, matches and ranks candidates
    /// for the current input. The selection goes back to the first result.
    pub fn refresh(&mut self, gateway: &dyn FilesystemGateway) {
        if self.mode.revert_if_root_lost(self.buffer.as_str()) {
            debug!(input = self.buffer.as_str(), "input left fuzzy root; back to prefix mode");
        }
        self.results = ranked_results(
            gateway,
            &mut self.mode,
            self.buffer.as_str(),
            self.settings.limits,
        );
        self.selected_index = 0;
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.results.is_empty() {
            self.selected_index = 0;
            return;
        }
        let max = self.results.len() - 1;
        self.selected_index = self.selected_index.saturating_add_signed(delta).min(max);
    }

    fn complete_selection(&mut self) -> bool {
        match self.results.get(self.selected_index) {
            Some(selected) => {
                let selected = selected.clone();
                self.buffer.set_text(selected)
            }
            None => false,
        }
    }

    fn toggle_fuzzy(&mut self) {
        if self.exit_fuzzy() {
            return;
        }
        self.mode = Mode::fuzzy_from_input(self.buffer.as_str());
        debug!(root = self.mode.fuzzy_root().unwrap_or_default(), "entered fuzzy mode");
    }

    fn exit_fuzzy(&mut self) -> bool {
        if !self.mode.is_fuzzy() {
            return false;
        }
        self.mode = Mode::Normal;
        true
    }
}
