//! Generator Service - runs one generator against the workspace.
//!
//! The workflow:
//! 1. Layer a fresh [`Tree`] over the workspace filesystem
//! 2. Run the generator against it
//! 3. Normalize what it wrote (JSON formatting, trailing newlines)
//! 4. Commit the net changes through the [`Filesystem`] port, unless this
//!    is a dry run
//!
//! A generator that fails leaves nothing on disk: its tree is dropped
//! before anything is committed.

use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        generators::{Generator, GeneratorCallback},
        ports::Filesystem,
        tree::{ChangeKind, FileChange, Tree},
        workspace::{ensure_trailing_newlines, format_json_files},
    },
    domain::GeneratorInfo,
    error::ForgeResult,
};

/// Outcome of one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub generator: &'static GeneratorInfo,
    /// Net changes in path order.
    pub changes: Vec<FileChange>,
    /// Follow-up tasks the generator asked for. Reported, never executed.
    pub callback: GeneratorCallback,
    /// `true` when the changes were computed but not written.
    pub dry_run: bool,
}

impl GenerationReport {
    /// Number of changes of the given kind.
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Runs generators and commits their trees.
pub struct GeneratorService {
    filesystem: Box<dyn Filesystem>,
}

impl GeneratorService {
    /// Create a new generator service over the given workspace.
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// The workspace this service reads from and writes to.
    pub fn filesystem(&self) -> &dyn Filesystem {
        self.filesystem.as_ref()
    }

    /// Run `generator` and, unless `dry_run`, write its changes.
    #[instrument(skip_all, fields(generator = generator.info().id, dry_run))]
    pub fn run(&self, generator: &dyn Generator, dry_run: bool) -> ForgeResult<GenerationReport> {
        let info = generator.info();
        info!("Running generator {}", info.id);

        let mut tree = Tree::new(self.filesystem.as_ref());
        let callback = generator.generate(&mut tree)?;

        format_json_files(&mut tree, "")?;
        ensure_trailing_newlines(&mut tree)?;
        let changes = tree.changes()?;
        debug!(changes = changes.len(), "Generator finished");

        if dry_run {
            info!(changes = changes.len(), "Dry run, nothing written");
        } else {
            self.commit(&changes)?;
            info!(changes = changes.len(), "Committed changes");
        }

        Ok(GenerationReport {
            generator: info,
            changes,
            callback,
            dry_run,
        })
    }

    /// Write `changes` in order. Stops at the first failure.
    fn commit(&self, changes: &[FileChange]) -> ForgeResult<()> {
        let total = changes.len();
        for (written, change) in changes.iter().enumerate() {
            if let Err(e) = self.apply(change) {
                warn!(path = %change.path, written, total, "Commit failed");
                return Err(ApplicationError::CommitFailed {
                    path: change.path.clone(),
                    written,
                    total,
                    reason: e.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn apply(&self, change: &FileChange) -> ForgeResult<()> {
        let path = Path::new(&change.path);
        match (&change.kind, &change.content) {
            (ChangeKind::Delete, _) => self.filesystem.remove_file(path),
            (_, Some(content)) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.filesystem.write_file(path, content)
            }
            (_, None) => Err(ApplicationError::ValidationFailed(format!(
                "{} change for {} has no content",
                change.kind, change.path
            ))
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::metadata;
    use crate::error::ForgeError;

    struct WriteFiles(&'static [(&'static str, &'static str)]);

    impl Generator for WriteFiles {
        fn info(&self) -> &'static GeneratorInfo {
            &metadata::TS_PROJECT
        }

        fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
            for (path, content) in self.0 {
                tree.write(path, *content);
            }
            Ok(GeneratorCallback::none())
        }
    }

    struct Failing;

    impl Generator for Failing {
        fn info(&self) -> &'static GeneratorInfo {
            &metadata::TS_PROJECT
        }

        fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
            tree.write("half-done.txt", "x");
            Err(ApplicationError::ValidationFailed("boom".into()).into())
        }
    }

    fn empty_workspace() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().returning(|_| Ok(None));
        fs.expect_exists().returning(|_| false);
        fs.expect_is_file().returning(|_| false);
        fs.expect_list_files().returning(|_| Ok(Vec::new()));
        fs
    }

    #[test]
    fn dry_run_writes_nothing() {
        let mut fs = empty_workspace();
        fs.expect_write_file().never();
        fs.expect_create_dir_all().never();

        let service = GeneratorService::new(Box::new(fs));
        let report = service
            .run(&WriteFiles(&[("packages/a/README.md", "# a")]), true)
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.count(ChangeKind::Create), 1);
        assert_eq!(report.changes[0].content.as_deref(), Some("# a\n"));
    }

    #[test]
    fn commit_creates_parents_and_formats_json() {
        let mut fs = empty_workspace();
        fs.expect_create_dir_all()
            .withf(|path| path == Path::new("packages/a"))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|path, content| {
                path == Path::new("packages/a/project.json")
                    && content == "{\n  \"name\": \"a\"\n}\n"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = GeneratorService::new(Box::new(fs));
        let report = service
            .run(&WriteFiles(&[("packages/a/project.json", r#"{"name":"a"}"#)]), false)
            .unwrap();
        assert_eq!(report.changes.len(), 1);
    }

    #[test]
    fn failed_generator_commits_nothing() {
        let mut fs = empty_workspace();
        fs.expect_write_file().never();

        let service = GeneratorService::new(Box::new(fs));
        let err = service.run(&Failing, false).unwrap_err();
        assert!(matches!(err, ForgeError::Application(ApplicationError::ValidationFailed(_))));
    }

    #[test]
    fn commit_failure_reports_progress() {
        let mut fs = empty_workspace();
        fs.expect_write_file().returning(|path, _| {
            if path == Path::new("b.txt") {
                Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "disk full".into(),
                }
                .into())
            } else {
                Ok(())
            }
        });

        let service = GeneratorService::new(Box::new(fs));
        let err = service
            .run(&WriteFiles(&[("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")]), false)
            .unwrap_err();
        match err {
            ForgeError::Application(ApplicationError::CommitFailed {
                path,
                written,
                total,
                reason,
            }) => {
                assert_eq!(path, "b.txt");
                assert_eq!(written, 1);
                assert_eq!(total, 3);
                assert!(reason.contains("disk full"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unchanged_rewrite_is_not_a_change() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_file()
            .returning(|_| Ok(Some("same\n".to_string())));
        fs.expect_exists().returning(|_| true);
        fs.expect_is_file().returning(|_| true);
        fs.expect_write_file().never();

        let service = GeneratorService::new(Box::new(fs));
        let report = service.run(&WriteFiles(&[("notes.txt", "same")]), false).unwrap();
        assert!(report.is_empty());
    }
}
