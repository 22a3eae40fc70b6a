//! Unified error handling for nxforge core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for nxforge core operations.
#[derive(Debug, Error, Clone)]
pub enum ForgeError {
    /// Errors from the domain layer (invalid options, unexpected workspace
    /// shape, parse failures).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (filesystem, commit failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ForgeError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in nxforge".into(),
                "Please report this issue at: https://github.com/nxforge/nxforge/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Precondition => ErrorCategory::Precondition,
                crate::domain::ErrorCategory::Parse => ErrorCategory::Parse,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Precondition,
    Parse,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> ForgeResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> ForgeResult<T> {
        self.map_err(|e| ForgeError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_messages_pass_through_unchanged() {
        let err: ForgeError = DomainError::UnsupportedIacProvider {
            value: "Pulumi".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Unsupported iacProvider Pulumi");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let parsed: Result<u16, _> = "x".parse::<u16>();
        let err = parsed.context("reading port").unwrap_err();
        assert!(matches!(err, ForgeError::Internal { ref message } if message.starts_with("reading port: ")));
    }
}
