use tracing::{debug, info, warn};

use crate::action_executor::{execute, ActionError};
use crate::config::Config;
use crate::contract::RenderFrame;
use crate::gateway::FilesystemGateway;
use crate::input_buffer::{directory_of, SEPARATOR};
use crate::keys::{KeyEvent, KeyParseError};
use crate::session::{SessionAction, SessionSettings, SessionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Closed {
        input_text: String,
        /// Whether focus should go back to whatever was active before the
        /// finder opened. False after a submit, since the opened item takes it.
        return_focus: bool,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("no finder session is open")]
    NoSession,
    #[error("invalid fuzzy trigger: {0}")]
    Trigger(#[from] KeyParseError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Owns the gateway and at most one live session. Closing a session keeps
/// its final input so the next open can start where the user left off.
pub struct Finder {
    settings: SessionSettings,
    gateway: Box<dyn FilesystemGateway>,
    session: Option<SessionState>,
    last_input: Option<String>,
}

impl Finder {
    pub fn new(config: &Config, gateway: Box<dyn FilesystemGateway>) -> Result<Self, FinderError> {
        Ok(Self::with_settings(
            SessionSettings::from_config(config)?,
            gateway,
        ))
    }

    pub fn with_settings(settings: SessionSettings, gateway: Box<dyn FilesystemGateway>) -> Self {
        Self {
            settings,
            gateway,
            session: None,
            last_input: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn frame(&self) -> Option<RenderFrame> {
        self.session.as_ref().map(SessionState::frame)
    }

    pub fn current_input_text(&self) -> Option<&str> {
        self.session.as_ref().map(SessionState::input_text)
    }

    pub fn last_input(&self) -> Option<&str> {
        self.last_input.as_deref()
    }

    /// Starts a fresh session seeded with `initial_text`, or with the directory
    /// of the previous session's input, or with the home directory. A session
    /// that is still open is discarded first.
    pub fn open(&mut self, initial_text: Option<&str>) -> RenderFrame {
        if let Some(discarded) = self.close() {
            debug!(input = discarded.as_str(), "replaced open session");
        }

        let seed = match initial_text {
            Some(text) => self.directory_seed(text),
            None => self.default_seed(),
        };
        info!(seed = seed.as_str(), "finder opened");
        let session = SessionState::open(self.gateway.as_ref(), &seed, self.settings.clone());
        let frame = session.frame();
        self.session = Some(session);
        frame
    }

    /// Ends the session and returns its final input.
    pub fn close(&mut self) -> Option<String> {
        let session = self.session.take()?;
        let input = session.input_text().to_string();
        info!(input = input.as_str(), "finder closed");
        self.last_input = Some(input.clone());
        Some(input)
    }

    /// Feeds one key to the open session. Only a failure to create the
    /// submitted path is returned, with the session left open so the user can
    /// correct the input; any other failed action is logged and still closes.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<KeyOutcome, FinderError> {
        let session = self.session.as_mut().ok_or(FinderError::NoSession)?;
        let Some(action) = session.handle_key(self.gateway.as_ref(), event) else {
            return Ok(KeyOutcome::Continue);
        };

        match execute(self.gateway.as_ref(), &action) {
            Ok(()) => {}
            Err(error @ ActionError::Create { .. }) => {
                warn!(%error, "could not create path; session stays open");
                return Err(error.into());
            }
            Err(error) => warn!(%error, "finder action failed"),
        }

        let return_focus = !matches!(action, SessionAction::Submit { .. });
        let input_text = self.close().unwrap_or_default();
        Ok(KeyOutcome::Closed {
            input_text,
            return_focus,
        })
    }

    fn directory_seed(&self, text: &str) -> String {
        let mut seed = text.to_string();
        if !seed.is_empty() && !seed.ends_with(SEPARATOR) && self.gateway.is_directory(text) {
            seed.push(SEPARATOR);
        }
        seed
    }

    fn default_seed(&self) -> String {
        if let Some(last) = self.last_input.as_deref() {
            let dir = directory_of(last);
            if !dir.is_empty() {
                return dir.to_string();
            }
        }
        home_seed()
    }
}

fn home_seed() -> String {
    let mut home = dirs::home_dir()
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !home.ends_with(SEPARATOR) {
        home.push(SEPARATOR);
    }
    home
}
