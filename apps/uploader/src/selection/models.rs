use serde::{Deserialize, Serialize};

use crate::selection::format::format_file_size;

/// A file proposed by the user (picked or dropped) before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub size: u64,
}

#[cfg(test)]
impl Candidate {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// A candidate that passed validation. Replaced wholesale on every new valid selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    /// Lower-cased, without the leading dot. Empty when the name has none.
    pub extension: String,
    pub display_size: String,
}

impl SelectedFile {
    pub(crate) fn from_candidate(candidate: &Candidate, extension: String) -> Self {
        Self {
            name: candidate.name.clone(),
            size: candidate.size,
            extension,
            display_size: format_file_size(candidate.size),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    Idle,
    Selected,
    Uploading,
    Success,
    Error,
}

impl UiState {
    /// States that always carry a `SelectedFile`.
    pub fn holds_file(self) -> bool {
        matches!(self, UiState::Selected | UiState::Uploading | UiState::Success)
    }
}

/// What a rendering layer needs to draw the widget: the stage, the held file
/// and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadStatus {
    pub state: UiState,
    pub file: Option<SelectedFile>,
    pub message: Option<String>,
}
