//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `nxforge-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::error::ForgeResult;

/// Port for the workspace on disk.
///
/// Implemented by:
/// - `nxforge_adapters::filesystem::LocalFilesystem` (production)
/// - `nxforge_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - All paths are relative to the workspace root
/// - `list_files` never descends into `node_modules`, `dist`, `.git`,
///   `.venv` or `.nx`
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a file. `Ok(None)` when no file exists at `path`.
    fn read_file(&self, path: &Path) -> ForgeResult<Option<String>>;

    /// Check if a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Check if `path` is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// All files below `dir`, recursively, relative to the workspace root.
    fn list_files(&self, dir: &Path) -> ForgeResult<Vec<PathBuf>>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> ForgeResult<()>;
}

/// Directory names the workspace scan skips.
pub const IGNORED_DIRS: &[&str] = &["node_modules", "dist", ".git", ".venv", ".nx"];
