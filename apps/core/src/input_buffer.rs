//! The editable path text. Edits only ever touch the end of the string.

pub const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let mut buffer = Self { text: text.into() };
        buffer.reseed_if_empty();
        buffer
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text up to and including the last separator, or the whole text when
    /// there is none.
    pub fn directory(&self) -> &str {
        directory_of(&self.text)
    }

    /// Appends `c` if it is printable. Returns whether the text changed.
    pub fn append_char(&mut self, c: char) -> bool {
        if !is_accepted_char(c) {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn delete_back_plain(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Removes a trailing path segment when the text ends in the separator,
    /// otherwise the trailing run of same-class characters.
    pub fn delete_back_word(&mut self) -> bool {
        if self.text.is_empty() {
            return false;
        }

        if self.text.ends_with(SEPARATOR) {
            self.text.pop();
            while let Some(last) = self.text.chars().next_back() {
                if last == SEPARATOR {
                    break;
                }
                self.text.pop();
            }
            return true;
        }

        let Some(run_class) = self.text.chars().next_back().map(CharClass::of) else {
            return false;
        };
        while let Some(last) = self.text.chars().next_back() {
            if CharClass::of(last) != run_class {
                break;
            }
            self.text.pop();
        }
        true
    }

    pub fn delete_all(&mut self) -> bool {
        let changed = !self.text.is_empty();
        self.text.clear();
        changed
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.text = text;
        true
    }

    /// Drops trailing whitespace so `"/tmp/notes "` names `notes`.
    pub fn trim_trailing_whitespace(&mut self) -> bool {
        let trimmed_len = self.text.trim_end().len();
        if trimmed_len == self.text.len() {
            return false;
        }
        self.text.truncate(trimmed_len);
        true
    }

    /// Restores the root separator after an edit emptied the text.
    pub fn reseed_if_empty(&mut self) -> bool {
        if !self.text.is_empty() {
            return false;
        }
        self.text.push(SEPARATOR);
        true
    }
}

pub fn directory_of(text: &str) -> &str {
    match text.rfind(SEPARATOR) {
        Some(index) => &text[..=index],
        None => text,
    }
}

/// Letters, digits, symbols, punctuation and the plain space are typed into
/// the buffer. Control characters, other whitespace, combining marks, format
/// characters and private-use code points (which some platforms use for arrow
/// and function keys) are not.
pub fn is_accepted_char(c: char) -> bool {
    if c == ' ' || c.is_ascii_graphic() {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !(is_combining_mark(c) || is_format_char(c) || is_private_use(c))
}

fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036f}'
            | '\u{0483}'..='\u{0489}'
            | '\u{0591}'..='\u{05bd}'
            | '\u{064b}'..='\u{065f}'
            | '\u{0900}'..='\u{0903}'
            | '\u{093a}'..='\u{094f}'
            | '\u{1ab0}'..='\u{1aff}'
            | '\u{1dc0}'..='\u{1dff}'
            | '\u{20d0}'..='\u{20ff}'
            | '\u{302a}'..='\u{302f}'
            | '\u{3099}'..='\u{309a}'
            | '\u{fe00}'..='\u{fe0f}'
            | '\u{fe20}'..='\u{fe2f}'
            | '\u{e0100}'..='\u{e01ef}'
    )
}

fn is_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{00ad}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061c}'
            | '\u{06dd}'
            | '\u{070f}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{e0001}'..='\u{e007f}'
    )
}

fn is_private_use(c: char) -> bool {
    matches!(
        c,
        '\u{e000}'..='\u{f8ff}' | '\u{f0000}'..='\u{ffffd}' | '\u{100000}'..='\u{10fffd}'
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Letter,
    Digit,
    Whitespace,
    Separator,
    Symbol,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c == SEPARATOR {
            Self::Separator
        } else if c.is_whitespace() {
            Self::Whitespace
        } else if c.is_numeric() {
            Self::Digit
        } else if c.is_alphabetic() {
            Self::Letter
        } else {
            Self::Symbol
        }
    }
}
