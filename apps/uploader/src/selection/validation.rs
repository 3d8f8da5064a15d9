use serde::Serialize;
use thiserror::Error;

use crate::selection::format::{file_extension, format_file_size};
use crate::selection::models::{Candidate, SelectedFile};

/// Extensions accepted for resume uploads, in display order.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".txt"];
/// 10 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported file type — allowed: {allowed}")]
    UnsupportedType { extension: String, allowed: String },

    #[error("file exceeds {}", size_label(.max))]
    TooLarge { size: u64, max: u64 },
}

fn size_label(bytes: &u64) -> String {
    format_file_size(*bytes)
}

/// The allow-list and size cap governing acceptance. Built once at startup
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRule {
    /// Dot-prefixed, lower-cased, deduplicated, in configuration order.
    allowed_extensions: Vec<String>,
    max_size: u64,
}

impl Default for ValidationRule {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_EXTENSIONS.iter().copied(), DEFAULT_MAX_SIZE)
    }
}

impl ValidationRule {
    /// Normalizes each entry: trims whitespace, lower-cases, adds the leading
    /// dot if missing. Empty entries are dropped.
    pub fn new<I, S>(extensions: I, max_size: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed_extensions: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if ext.is_empty() {
                continue;
            }
            let ext = format!(".{ext}");
            if !allowed_extensions.contains(&ext) {
                allowed_extensions.push(ext);
            }
        }
        Self {
            allowed_extensions,
            max_size,
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// `pdf, doc, docx, txt` for the default rule.
    pub fn allowed_summary(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|e| e.trim_start_matches('.'))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn accepts_extension(&self, extension: &str) -> bool {
        let dotted = format!(".{}", extension.to_lowercase());
        self.allowed_extensions.iter().any(|e| *e == dotted)
    }

    /// Checks the extension first, then the size. A disallowed type over the
    /// cap reports `UnsupportedType`.
    pub fn validate(&self, candidate: &Candidate) -> Result<SelectedFile, ValidationError> {
        let extension = file_extension(&candidate.name);

        if !self.accepts_extension(&extension) {
            return Err(ValidationError::UnsupportedType {
                extension,
                allowed: self.allowed_summary(),
            });
        }

        if candidate.size > self.max_size {
            return Err(ValidationError::TooLarge {
                size: candidate.size,
                max: self.max_size,
            });
        }

        Ok(SelectedFile::from_candidate(candidate, extension))
    }
}
