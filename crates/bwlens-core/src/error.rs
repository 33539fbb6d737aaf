//! Errors raised while loading an export.

use std::path::PathBuf;
use thiserror::Error;

/// Why a load was rejected. Every variant leaves the previous session intact.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The selected file is not a JSON document.
    #[error("not a JSON file: {}", path.display())]
    NotJson { path: PathBuf },

    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not JSON or does not match the export schema.
    #[error("invalid BitWarden export: {0}")]
    Validation(#[from] serde_json::Error),
}

impl LoadError {
    /// The single line shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            LoadError::NotJson { .. } => "Please upload a valid JSON file.",
            LoadError::FileRead { .. } => "Error reading file.",
            LoadError::Validation(_) => "Failed to parse file. Check for correct BitWarden export.",
        }
    }

    /// Whether the failure came from the document itself rather than the file system.
    pub fn is_validation(&self) -> bool {
        matches!(self, LoadError::Validation(_))
    }
}
