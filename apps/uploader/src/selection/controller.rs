use thiserror::Error;
use tracing::{debug, info, warn};

use crate::selection::models::{Candidate, SelectedFile, UiState, UploadStatus};
use crate::selection::validation::{ValidationError, ValidationRule};

/// Caller-usage errors for `complete()`. Distinct from `ValidationError`:
/// these mean the request arrived in the wrong state, not that a file was bad.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no file selected; select a resume before completing the upload")]
    NoFileSelected,

    #[error("an upload is already in progress")]
    UploadInProgress,
}

/// Proof that an upload was started for a given selection. Only the ticket
/// matching the controller's current generation may complete the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
    file: SelectedFile,
}

impl UploadTicket {
    /// The file being uploaded, as held when the upload started.
    pub fn file(&self) -> &SelectedFile {
        &self.file
    }
}

/// Drives the Idle / Selected / Uploading / Success / Error lifecycle for one widget.
///
/// Every `select` and `reset` advances the generation, which invalidates
/// any ticket issued before it.
#[derive(Debug, Clone)]
pub struct FileSelectionController {
    rule: ValidationRule,
    state: UiState,
    file: Option<SelectedFile>,
    error: Option<ValidationError>,
    generation: u64,
}

impl Default for FileSelectionController {
    fn default() -> Self {
        Self::new(ValidationRule::default())
    }
}

impl FileSelectionController {
    pub fn new(rule: ValidationRule) -> Self {
        Self {
            rule,
            state: UiState::Idle,
            file: None,
            error: None,
            generation: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> UiState {
        self.state
    }

    #[cfg(test)]
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Accepts or rejects a picked/dropped file. A valid candidate replaces
    /// whatever was held; an invalid one clears it and lands in `Error`.
    pub fn select(&mut self, candidate: &Candidate) -> UploadStatus {
        self.generation += 1;

        match self.rule.validate(candidate) {
            Ok(file) => {
                info!(name = %file.name, size = file.size, "Resume selected");
                self.file = Some(file);
                self.error = None;
                self.state = UiState::Selected;
            }
            Err(e) => {
                warn!(name = %candidate.name, size = candidate.size, "Rejected file: {e}");
                self.file = None;
                self.error = Some(e);
                self.state = UiState::Error;
            }
        }

        self.status()
    }

    /// First half of `complete()`: moves to `Uploading` and hands out the
    /// ticket the deferred completion must present.
    pub fn begin_upload(&mut self) -> Result<UploadTicket, SelectionError> {
        if self.state == UiState::Uploading {
            return Err(SelectionError::UploadInProgress);
        }
        let file = self.file.clone().ok_or(SelectionError::NoFileSelected)?;

        info!(name = %file.name, "Upload started");
        self.generation += 1;
        self.state = UiState::Uploading;
        Ok(UploadTicket {
            generation: self.generation,
            file,
        })
    }

    /// Second half of `complete()`. Returns `false` and leaves state alone
    /// when the ticket was issued before the latest `select` or `reset`.
    pub fn finish_upload(&mut self, ticket: &UploadTicket) -> bool {
        if ticket.generation != self.generation || self.state != UiState::Uploading {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Ignoring stale upload completion"
            );
            return false;
        }

        self.state = UiState::Success;
        info!(name = %ticket.file.name, "Upload complete");
        true
    }

    pub fn reset(&mut self) -> UploadStatus {
        self.generation += 1;
        self.file = None;
        self.error = None;
        self.state = UiState::Idle;
        debug!("Selection reset");
        self.status()
    }

    pub fn status(&self) -> UploadStatus {
        debug_assert_eq!(self.state.holds_file(), self.file.is_some());

        let message = match (self.state, &self.file, &self.error) {
            (UiState::Selected, Some(f), _) => Some(format!("file \"{}\" selected", f.name)),
            (UiState::Uploading, Some(f), _) => Some(format!("uploading \"{}\"", f.name)),
            (UiState::Success, Some(f), _) => Some(format!("upload of \"{}\" complete", f.name)),
            (UiState::Error, _, Some(e)) => Some(e.to_string()),
            _ => None,
        };

        UploadStatus {
            state: self.state,
            file: self.file.clone(),
            message,
        }
    }
}
