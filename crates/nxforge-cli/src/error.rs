//! Errors surfaced by the `nxforge` binary.
//!
//! Every failure ends up as a [`CliError`], which knows its exit code, a
//! short list of suggestions, and how to render itself on stderr.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{debug, error, warn};

use nxforge_core::error::{ErrorCategory as CoreCategory, ForgeError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// A flag or config value failed validation.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error("Workspace not found at {path}")]
    WorkspaceNotFound { path: PathBuf },

    /// Reading, parsing or writing `config.toml` failed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// A generator or service failure; suggestions come from the core error.
    #[error("Generation failed: {0}")]
    Core(#[from] ForgeError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Run the command with --help to see accepted values".into()],
            Self::WorkspaceNotFound { path } => vec![
                format!("'{}' is not a directory", path.display()),
                "Point -w / --workspace at the directory holding nx.json".into(),
            ],
            Self::ConfigError { .. } => vec![
                format!(
                    "Inspect {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Regenerate it with 'nxforge init --force'".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::IoError { .. } => vec!["Check that the workspace is writable".into()],
            Self::Cancelled => vec!["Nothing was written".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::Cancelled => ErrorCategory::UserError,
            Self::WorkspaceNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Precondition | CoreCategory::Parse => {
                    ErrorCategory::UserError
                }
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Process exit code: 2 user error, 3 not found, 4 configuration,
    /// 1 anything else.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    fn causes(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        std::iter::successors(self.source(), |err| (*err).source())
    }

    /// Stderr text: the message, its causes when `verbose`, then suggestions.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let (label, heading) = if color {
            (
                "Error:".red().bold().to_string(),
                "Suggestions:".yellow().bold().to_string(),
            )
        } else {
            ("Error:".to_string(), "Suggestions:".to_string())
        };

        let mut out = format!("\n{label} {self}\n");
        if verbose {
            for cause in self.causes() {
                out.push_str(&format!("  Caused by: {cause}\n"));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n{heading}\n"));
            for suggestion in &suggestions {
                out.push_str(&format!("  - {suggestion}\n"));
            }
        }

        if !verbose && self.causes().next().is_some() {
            out.push_str("\nRe-run with -v / --verbose to see the cause.\n");
        }
        out
    }

    /// One event per failure; warnings for user mistakes, errors otherwise.
    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                warn!(?category, exit_code = self.exit_code(), "{self}");
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                error!(?category, exit_code = self.exit_code(), "{self}");
            }
        }
        for cause in self.causes() {
            debug!(%cause, "caused by");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

/// Attach a context message while converting into [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, ForgeError> {
    /// Core errors already name what failed, so the context is only logged.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| {
            debug!(context = %f().into(), "core operation failed");
            CliError::Core(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nxforge_core::application::ApplicationError;
    use nxforge_core::domain::DomainError;
    use std::io;

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn unknown_generator_suggests_list() {
        let err = CliError::Core(ApplicationError::UnknownGenerator { id: "x".into() }.into());
        assert!(err.suggestions().iter().any(|s| s.contains("nxforge list")));
    }

    #[test]
    fn workspace_not_found_mentions_flag() {
        let err = CliError::WorkspaceNotFound {
            path: PathBuf::from("/tmp/none"),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--workspace")));
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        assert_eq!(
            CliError::InvalidInput {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            2
        );
        let invalid_name = CliError::Core(
            DomainError::InvalidName {
                name: "1api".into(),
                reason: "must start with a letter".into(),
            }
            .into(),
        );
        assert_eq!(invalid_name.exit_code(), 2);
    }

    #[test]
    fn exit_code_not_found() {
        let err = CliError::Core(ApplicationError::UnknownGenerator { id: "x".into() }.into());
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn plain_render_has_header_and_suggestions() {
        let err = CliError::WorkspaceNotFound {
            path: PathBuf::from("/tmp/x"),
        };
        let s = err.render(false, false);
        assert!(s.contains("Error: Workspace not found at /tmp/x"));
        assert!(s.contains("Suggestions:\n  - '/tmp/x' is not a directory"));
        assert!(!s.contains('\u{1b}'));
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn verbose_render_shows_cause_chain() {
        let err = CliError::ConfigError {
            message: "bad".into(),
            source: Some(Box::new(io::Error::other("root cause"))),
        };
        let s = err.render(true, false);
        assert!(s.contains("Caused by: root cause"));
        assert!(!s.contains("--verbose"));

        let terse = err.render(false, false);
        assert!(!terse.contains("root cause"));
        assert!(terse.contains("--verbose"));
    }

    #[test]
    fn colored_render_keeps_the_message() {
        let err = CliError::Cancelled;
        let s = err.render(false, true);
        assert!(s.contains('\u{1b}'));
        assert!(s.contains("Operation cancelled"));
        assert!(s.contains("Nothing was written"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }
}
