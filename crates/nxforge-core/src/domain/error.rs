// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (a failed generator run can be reported more than once)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (invalid input)
    // ========================================================================
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Unsupported iacProvider {value}")]
    UnsupportedIacProvider { value: String },

    #[error("Unsupported {option} {value}")]
    UnsupportedOption { option: &'static str, value: String },

    #[error("Unknown {ecosystem} dependency '{name}': no pinned version is registered")]
    UnknownDependency {
        name: String,
        ecosystem: &'static str,
    },

    #[error("A component named '{name}' already exists in project '{project}'")]
    ComponentExists { project: String, name: String },

    #[error("No free port at or above {base}")]
    PortsExhausted { base: u16 },

    // ========================================================================
    // Precondition Errors (workspace is not in the expected shape)
    // ========================================================================
    #[error("Expected file not found: {path}")]
    MissingFile { path: String },

    #[error(
        "This project does not have a source root. Please add a source root to the project \
         configuration before running this generator. (project: {project})"
    )]
    MissingSourceRoot { project: String },

    #[error("Project '{name}' already exists at {root}")]
    ProjectExists { name: String, root: String },

    #[error("Unexpected structure in {path}: {reason}")]
    UnexpectedShape { path: String, reason: String },

    // ========================================================================
    // Parse Errors (from underlying parsers)
    // ========================================================================
    #[error("Failed to parse {format} file {path}: {reason}")]
    ParseFailed {
        path: String,
        format: &'static str,
        reason: String,
    },

    #[error("Malformed source in {path}: {reason}")]
    MalformedSource { path: String, reason: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("Project '{name}' was not found in the workspace")]
    ProjectNotFound { name: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidName { reason, .. } => vec![
                format!("Details: {}", reason),
                "Use letters, digits, '-' and '_' only".into(),
            ],
            Self::UnsupportedIacProvider { .. } => vec![
                "Supported values: CDK, Terraform, Inherit".into(),
                "Inherit reads iac.provider from nxforge.config.json".into(),
            ],
            Self::UnknownDependency { name, .. } => vec![
                format!("'{}' has no pinned version in the version registry", name),
                "Add it to the registry before referencing it from a generator".into(),
            ],
            Self::MissingFile { path } => vec![
                format!("Create {} or run the generator from the workspace root", path),
                "Use --workspace to point at the Nx workspace".into(),
            ],
            Self::MissingSourceRoot { project } => vec![format!(
                "Add \"sourceRoot\" to {}'s project.json",
                project
            )],
            Self::ProjectNotFound { name } => vec![
                format!("No project.json declares the name '{}'", name),
                "Project names may be given with or without their npm scope".into(),
            ],
            Self::ProjectExists { .. } | Self::ComponentExists { .. } => {
                vec!["Choose a different name".into()]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName { .. }
            | Self::UnsupportedIacProvider { .. }
            | Self::UnsupportedOption { .. }
            | Self::UnknownDependency { .. }
            | Self::ComponentExists { .. }
            | Self::PortsExhausted { .. }
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::MissingFile { .. }
            | Self::MissingSourceRoot { .. }
            | Self::ProjectExists { .. }
            | Self::UnexpectedShape { .. } => ErrorCategory::Precondition,
            Self::ParseFailed { .. } | Self::MalformedSource { .. } => ErrorCategory::Parse,
            Self::ProjectNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Precondition,
    Parse,
    NotFound,
}
