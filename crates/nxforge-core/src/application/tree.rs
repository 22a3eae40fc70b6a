//! Virtual file tree.
//!
//! A [`Tree`] records every write and delete a generator makes on top of a
//! read-only view of the workspace. Nothing reaches the disk until the
//! [`GeneratorService`](crate::application::GeneratorService) commits the
//! tree's [`changes`](Tree::changes) after the generator succeeded.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use crate::application::ports::Filesystem;
use crate::domain::DomainError;
use crate::error::ForgeResult;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Write(String),
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

impl ChangeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pending change, in path order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
    /// New content; `None` for deletions.
    pub content: Option<String>,
}

/// Pending changes over an optional read-only base.
pub struct Tree<'fs> {
    base: Option<&'fs dyn Filesystem>,
    pending: BTreeMap<String, Pending>,
}

impl fmt::Debug for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("has_base", &self.base.is_some())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Default for Tree<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Normalize a workspace-relative path: `\` → `/`, no `.` or empty
/// segments, `..` resolved lexically.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let unified = path.replace('\\', "/");
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Join workspace-relative path segments.
pub fn join_path(base: &str, rest: &str) -> String {
    normalize_path(&format!("{base}/{rest}"))
}

fn is_under(path: &str, dir: &str) -> bool {
    dir.is_empty() || path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}

impl<'fs> Tree<'fs> {
    pub fn new(base: &'fs dyn Filesystem) -> Self {
        Self {
            base: Some(base),
            pending: BTreeMap::new(),
        }
    }

    /// A tree over an empty workspace.
    pub fn empty() -> Self {
        Self {
            base: None,
            pending: BTreeMap::new(),
        }
    }

    fn base_read(&self, path: &str) -> ForgeResult<Option<String>> {
        match self.base {
            Some(fs) => fs.read_file(Path::new(path)),
            None => Ok(None),
        }
    }

    fn base_is_file(&self, path: &str) -> bool {
        self.base.is_some_and(|fs| fs.is_file(Path::new(path)))
    }

    /// File content, or `None` when no live file exists.
    pub fn read(&self, path: &str) -> ForgeResult<Option<String>> {
        let path = normalize_path(path);
        match self.pending.get(&path) {
            Some(Pending::Write(content)) => Ok(Some(content.clone())),
            Some(Pending::Delete) => Ok(None),
            None => self.base_read(&path),
        }
    }

    /// File content; a missing file is a [`DomainError::MissingFile`].
    pub fn read_required(&self, path: &str) -> ForgeResult<String> {
        self.read(path)?.ok_or_else(|| {
            DomainError::MissingFile {
                path: normalize_path(path),
            }
            .into()
        })
    }

    pub fn write(&mut self, path: &str, content: impl Into<String>) {
        self.pending
            .insert(normalize_path(path), Pending::Write(content.into()));
    }

    pub fn is_file(&self, path: &str) -> bool {
        let path = normalize_path(path);
        match self.pending.get(&path) {
            Some(Pending::Write(_)) => true,
            Some(Pending::Delete) => false,
            None => self.base_is_file(&path),
        }
    }

    /// A live file at `path`, or a directory containing at least one.
    pub fn exists(&self, path: &str) -> bool {
        self.is_file(path)
            || self
                .list_files(path)
                .map(|files| !files.is_empty())
                .unwrap_or(false)
    }

    /// Delete a file, or every file below a directory.
    pub fn delete(&mut self, path: &str) -> ForgeResult<()> {
        let path = normalize_path(path);
        let files = if self.is_file(&path) {
            vec![path]
        } else {
            self.list_files(&path)?
        };
        for file in files {
            if self.base_is_file(&file) {
                self.pending.insert(file, Pending::Delete);
            } else {
                self.pending.remove(&file);
            }
        }
        Ok(())
    }

    /// Every live file below `dir`, recursively, sorted.
    pub fn list_files(&self, dir: &str) -> ForgeResult<Vec<String>> {
        let dir = normalize_path(dir);
        let mut files = BTreeSet::new();

        if let Some(fs) = self.base {
            for file in fs.list_files(Path::new(&dir))? {
                let file = normalize_path(&file.to_string_lossy());
                if is_under(&file, &dir) && !matches!(self.pending.get(&file), Some(Pending::Delete)) {
                    files.insert(file);
                }
            }
        }
        for (path, change) in &self.pending {
            if matches!(change, Pending::Write(_)) && is_under(path, &dir) {
                files.insert(path.clone());
            }
        }

        Ok(files.into_iter().collect())
    }

    /// Immediate entry names (files and directories) of `dir`, sorted.
    pub fn children(&self, dir: &str) -> ForgeResult<Vec<String>> {
        let dir = normalize_path(dir);
        let offset = if dir.is_empty() { 0 } else { dir.len() + 1 };
        let names: BTreeSet<String> = self
            .list_files(&dir)?
            .iter()
            .filter_map(|file| file.get(offset..))
            .filter_map(|rest| rest.split('/').next())
            .map(str::to_string)
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Net changes against the base. Writes that leave a file unchanged are
    /// not reported.
    pub fn changes(&self) -> ForgeResult<Vec<FileChange>> {
        let mut changes = Vec::new();
        for (path, change) in &self.pending {
            let before = self.base_read(path)?;
            match (change, before) {
                (Pending::Write(content), None) => changes.push(FileChange {
                    path: path.clone(),
                    kind: ChangeKind::Create,
                    content: Some(content.clone()),
                }),
                (Pending::Write(content), Some(before)) if *content != before => {
                    changes.push(FileChange {
                        path: path.clone(),
                        kind: ChangeKind::Update,
                        content: Some(content.clone()),
                    })
                }
                (Pending::Write(_), Some(_)) => {}
                (Pending::Delete, Some(_)) => changes.push(FileChange {
                    path: path.clone(),
                    kind: ChangeKind::Delete,
                    content: None,
                }),
                (Pending::Delete, None) => {}
            }
        }
        Ok(changes)
    }

    /// Paths written or deleted so far, changed or not.
    pub fn touched(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }
}
