use serde::{Deserialize, Serialize};

/// Everything the presenter needs to draw one frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderFrame {
    pub input_text: String,
    /// Leading bytes every result shares with the input (the listed
    /// directory, or the fuzzy root).
    pub base_length: usize,
    pub results: Vec<String>,
    pub selected_index: usize,
    pub fuzzy: bool,
}

impl RenderFrame {
    /// The part of `result` after the shared base, or the whole result when
    /// it is shorter than the base or the base splits a character.
    pub fn result_suffix<'a>(&self, result: &'a str) -> &'a str {
        result.get(self.base_length..).unwrap_or(result)
    }

    pub fn selected(&self) -> Option<&str> {
        self.results.get(self.selected_index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClosedDto {
    pub input_text: String,
    pub return_focus: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionFailedDto {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum SessionEvent {
    Frame(RenderFrame),
    Closed(ClosedDto),
    ActionFailed(ActionFailedDto),
}
