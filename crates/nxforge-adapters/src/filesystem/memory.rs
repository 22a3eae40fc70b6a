//! In-memory filesystem adapter for testing.

use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use nxforge_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, IGNORED_DIRS},
    },
    error::ForgeResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same contents, so a test can hand one clone to a
/// service and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<BTreeMap<PathBuf, String>>>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// A filesystem pre-populated with `files`.
    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let fs = Self::new();
        {
            let mut inner = fs.write();
            for (path, content) in files {
                inner.insert(PathBuf::from(path), content.to_string());
            }
        }
        fs
    }

    /// File content (testing helper).
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read().get(path.as_ref()).cloned()
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.read().keys().cloned().collect()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<PathBuf, String>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<PathBuf, String>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_ignored(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => IGNORED_DIRS.iter().any(|ignored| name == *ignored),
        _ => false,
    })
}

impl Filesystem for MemoryFilesystem {
    fn read_file(&self, path: &Path) -> ForgeResult<Option<String>> {
        Ok(self.read().get(path).cloned())
    }

    fn exists(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || self.read().keys().any(|p| p.starts_with(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.read().contains_key(path)
    }

    fn list_files(&self, dir: &Path) -> ForgeResult<Vec<PathBuf>> {
        Ok(self
            .read()
            .keys()
            .filter(|p| p.as_path() != dir && p.starts_with(dir))
            .filter(|p| !is_ignored(p.strip_prefix(dir).unwrap_or(p)))
            .cloned()
            .collect())
    }

    fn create_dir_all(&self, _path: &Path) -> ForgeResult<()> {
        // Directories exist implicitly.
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        let mut inner = self.write();
        if inner.keys().any(|p| path.starts_with(p) && p != path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "A parent path is a file".into(),
            }
            .into());
        }
        inner.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> ForgeResult<()> {
        self.write().remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_contents() {
        let fs = MemoryFilesystem::new();
        let handle = fs.clone();
        fs.write_file(Path::new("a/b.txt"), "b").unwrap();
        assert_eq!(handle.contents("a/b.txt").as_deref(), Some("b"));
        assert!(handle.exists(Path::new("a")));
        assert!(!handle.is_file(Path::new("a")));
    }

    #[test]
    fn listing_is_scoped_and_skips_ignored() {
        let fs = MemoryFilesystem::with_files([
            ("packages/api/project.json", "{}"),
            ("packages/api/node_modules/x/index.js", ""),
            ("packages/web/project.json", "{}"),
        ]);
        assert_eq!(
            fs.list_files(Path::new("packages/api")).unwrap(),
            vec![PathBuf::from("packages/api/project.json")]
        );
        assert_eq!(fs.list_files(Path::new("")).unwrap().len(), 2);
    }

    #[test]
    fn file_cannot_shadow_a_directory_parent() {
        let fs = MemoryFilesystem::with_files([("README.md", "#")]);
        assert!(fs.write_file(Path::new("README.md/nested"), "x").is_err());
    }
}
