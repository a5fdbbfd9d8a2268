use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Tab,
    Enter,
    Escape,
    Backspace,
    /// Forward delete.
    Delete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Alt or Ctrl on backspace removes a word.
    pub fn is_word(&self) -> bool {
        self.alt || self.ctrl
    }

    /// Meta on backspace clears the whole input.
    pub fn is_clear(&self) -> bool {
        self.meta
    }

    /// Meta on enter opens the submitted path in a terminal.
    pub fn is_terminal(&self) -> bool {
        self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    /// Parses a chord such as `Ctrl+F`, `Alt+Backspace` or `Tab`.
    pub fn parse(input: &str) -> Result<Self, KeyParseError> {
        let raw_parts: Vec<&str> = input.split('+').map(str::trim).collect();
        // "Ctrl++" names the plus key itself.
        let raw_parts: Vec<&str> = if input.trim_end().ends_with("++") {
            let mut parts = raw_parts[..raw_parts.len() - 2].to_vec();
            parts.push("+");
            parts
        } else {
            raw_parts
        };

        let Some((key_raw, modifier_parts)) = raw_parts.split_last() else {
            return Err(KeyParseError::MissingKey);
        };

        let mut modifiers = Modifiers::NONE;
        for part in modifier_parts {
            match normalize_modifier(part)? {
                ModifierName::Ctrl => modifiers.ctrl = true,
                ModifierName::Alt => modifiers.alt = true,
                ModifierName::Shift => modifiers.shift = true,
                ModifierName::Meta => modifiers.meta = true,
            }
        }

        let key = normalize_key(key_raw)?;
        Ok(Self { key, modifiers })
    }

    /// A printable key with no modifier besides shift, i.e. one that types.
    pub fn is_plain_text(&self) -> bool {
        let m = self.modifiers;
        matches!(self.key, Key::Char(_)) && !(m.ctrl || m.alt || m.meta)
    }

    /// True when `event` is the chord this event describes. Letter keys under a
    /// non-shift modifier compare case-insensitively, since terminals and window
    /// systems disagree on whether Ctrl+F reports `f` or `F`.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if self.modifiers != event.modifiers {
            return false;
        }
        match (self.key, event.key) {
            (Key::Char(expected), Key::Char(actual)) if !self.modifiers.is_empty() => {
                expected.eq_ignore_ascii_case(&actual)
            }
            (expected, actual) => expected == actual,
        }
    }
}

impl Display for KeyEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.alt {
            write!(f, "Alt+")?;
        }
        if self.modifiers.shift {
            write!(f, "Shift+")?;
        }
        if self.modifiers.meta {
            write!(f, "Meta+")?;
        }
        match self.key {
            Key::Char(' ') => write!(f, "Space"),
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Tab => write!(f, "Tab"),
            Key::Enter => write!(f, "Enter"),
            Key::Escape => write!(f, "Esc"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("key chord is missing a key")]
    MissingKey,
    #[error("unsupported modifier '{0}'; use Ctrl, Alt, Shift or Meta")]
    UnsupportedModifier(String),
    #[error("unsupported key '{0}'")]
    UnsupportedKey(String),
    #[error("unterminated '<' in key script at byte {0}")]
    UnterminatedChord(usize),
}

enum ModifierName {
    Ctrl,
    Alt,
    Shift,
    Meta,
}

fn normalize_modifier(input: &str) -> Result<ModifierName, KeyParseError> {
    match input.to_ascii_lowercase().as_str() {
        "ctrl" | "control" | "c" => Ok(ModifierName::Ctrl),
        "alt" | "option" | "opt" | "a" => Ok(ModifierName::Alt),
        "shift" | "s" => Ok(ModifierName::Shift),
        "meta" | "cmd" | "command" | "super" | "win" | "m" => Ok(ModifierName::Meta),
        _ => Err(KeyParseError::UnsupportedModifier(input.to_string())),
    }
}

fn normalize_key(input: &str) -> Result<Key, KeyParseError> {
    if input.is_empty() {
        return Err(KeyParseError::MissingKey);
    }

    let mut chars = input.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_control() {
            return Err(KeyParseError::UnsupportedKey(input.to_string()));
        }
        return Ok(Key::Char(c));
    }

    match input.to_ascii_lowercase().as_str() {
        "up" => Ok(Key::Up),
        "down" => Ok(Key::Down),
        "tab" => Ok(Key::Tab),
        "enter" | "return" | "cr" => Ok(Key::Enter),
        "esc" | "escape" => Ok(Key::Escape),
        "backspace" | "bs" => Ok(Key::Backspace),
        "delete" | "del" => Ok(Key::Delete),
        "space" => Ok(Key::Char(' ')),
        "lt" => Ok(Key::Char('<')),
        _ => Err(KeyParseError::UnsupportedKey(input.to_string())),
    }
}

/// Expands a key script into events. Plain characters type themselves and
/// `<chord>` tokens produce named or modified keys: `src/<Ctrl+F>mc<Down><Tab>`.
pub fn parse_key_script(script: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    let mut events = Vec::new();
    let mut rest = script;
    let mut offset = 0;

    while let Some(c) = rest.chars().next() {
        if c == '<' {
            let Some(end) = rest.find('>') else {
                return Err(KeyParseError::UnterminatedChord(offset));
            };
            // `<Ctrl+>>` style chords name the '>' key.
            let end = if rest[end + 1..].starts_with('>') && rest[..end].ends_with('+') {
                end + 1
            } else {
                end
            };
            events.push(KeyEvent::parse(&rest[1..end])?);
            offset += end + 1;
            rest = &rest[end + 1..];
            continue;
        }

        events.push(KeyEvent::char(c));
        offset += c.len_utf8();
        rest = &rest[c.len_utf8()..];
    }

    Ok(events)
}
