//! Error types for document persistence and tree lookups.
//!
//! Errors are classified by the policy the caller applies:
//! - Load failures: surfaced to the operator; nothing was loaded (all-or-nothing)
//! - Save failures: surfaced to the operator; in-memory state is untouched so a retry is safe
//! - Lookup failures: programming/selection errors against the company tree
//!
//! Dialog cancellation is not an error (see `store::SaveOutcome::Cancelled`),
//! and the specialty cache swallows its own failures (`specialty.rs`).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Load failures
    #[error("Could not read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not parse {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    // Save failures
    #[error("Could not serialize document: {0}")]
    SerializeFailed(serde_json::Error),

    #[error("Could not write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // Tree lookups
    #[error("Unknown company: {0}")]
    UnknownCompany(String),

    #[error("Unknown project: {0}")]
    UnknownProject(String),

    #[error("Week {0} does not exist in this project")]
    UnknownWeek(u32),

    #[error("A company named {0} already exists")]
    DuplicateCompany(String),

    #[error("A project named {0} already exists in this company")]
    DuplicateProject(String),

    #[error("Week {0} already exists in this project")]
    DuplicateWeek(u32),

    #[error("Home directory not found")]
    NoHomeDir,

    // Application state
    #[error("No database file is open")]
    NoDatabase,

    #[error("Internal state lock poisoned")]
    LockPoisoned,
}

impl AppError {
    /// True for failures raised while reading or parsing a document.
    /// The in-memory tree was not touched; the previous state remains valid.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, AppError::ReadFailed { .. } | AppError::ParseFailed { .. })
    }

    /// True for failures raised while serializing or writing a document.
    /// The on-disk file and the in-memory tree are both unchanged.
    pub fn is_save_failure(&self) -> bool {
        matches!(
            self,
            AppError::SerializeFailed(_) | AppError::WriteFailed { .. }
        )
    }

    /// Operator-facing recovery hint for the error dialog.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            AppError::ReadFailed { .. } => "Check that the file exists and is readable.",
            AppError::ParseFailed { .. } => {
                "The file is not valid JSON. Restore it from a backup before retrying."
            }
            AppError::SerializeFailed(_) => "Retry the save. Report this if it persists.",
            AppError::WriteFailed { .. } => "Check file permissions and disk space, then retry.",
            AppError::UnknownCompany(_) | AppError::UnknownProject(_) => {
                "Reload the database; the selection no longer exists."
            }
            AppError::UnknownWeek(_) => "Reload the project; the week no longer exists.",
            AppError::DuplicateCompany(_) | AppError::DuplicateProject(_) => {
                "Pick a name that is not already in use."
            }
            AppError::DuplicateWeek(_) => "Pick a week number that is not already in use.",
            AppError::NoHomeDir => "Set HOME so application data has somewhere to live.",
            AppError::NoDatabase => "Open or create a database file first.",
            AppError::LockPoisoned => "Restart the application.",
        }
    }
}
