//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Writing the finished tree to disk failed part way.
    #[error("Failed to commit {path} ({written} of {total} changes written): {reason}")]
    CommitFailed {
        path: String,
        written: usize,
        total: usize,
        reason: String,
    },

    /// No generator is registered under the requested id.
    #[error("Unknown generator '{id}'")]
    UnknownGenerator { id: String },

    /// Serializing a configuration value failed.
    #[error("Failed to serialize {path}: {reason}")]
    SerializeFailed { path: String, reason: String },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::CommitFailed { written, .. } if *written > 0 => vec![
                "Some files were written before the failure".into(),
                "Review the workspace with your version control tool".into(),
            ],
            Self::UnknownGenerator { .. } => vec![
                "Try: nxforge list to see available generators".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::CommitFailed { .. } => ErrorCategory::Internal,
            Self::SerializeFailed { .. } => ErrorCategory::Internal,
            Self::UnknownGenerator { .. } => ErrorCategory::NotFound,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}
