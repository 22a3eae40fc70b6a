//! Application layer for nxforge.
//!
//! This layer contains:
//! - **Tree**: the in-memory overlay every generator edits
//! - **Workspace helpers**: JSON, TOML, target-graph and AST edits on the tree
//! - **Shared bootstrappers**: the `common/*` packages generators build on
//! - **Generators**: one per catalogue entry
//! - **Services**: use case orchestration (GeneratorService, CatalogService)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! Business rules that need no tree live in `crate::domain`.

pub mod error;
pub mod generators;
pub mod ports;
pub mod services;
pub mod shared;
pub mod templates;
pub mod tree;
pub mod workspace;

// Re-export main services
pub use services::{CatalogService, GenerationReport, GeneratorService, GeneratorSummary};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, IGNORED_DIRS};

pub use error::ApplicationError;
pub use generators::{Generator, GeneratorCallback, PostGenerateTask};
pub use tree::{ChangeKind, FileChange, Tree};
