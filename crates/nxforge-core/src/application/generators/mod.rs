//! Generators: one typed options record in, a set of tree edits out.
//!
//! A generator never touches disk. It reads and writes through the
//! [`Tree`] it is handed and reports the follow-up work it wants done
//! (installing dependencies) as a [`GeneratorCallback`]. Generators that
//! build on others (`py#fast-api` creates its project through
//! `py#project`) call them directly, one after the other, on the same tree.

use std::fmt;

use serde::Serialize;

use crate::application::tree::Tree;
use crate::domain::GeneratorInfo;
use crate::error::ForgeResult;

pub mod py_fast_api;
pub mod py_lambda_function;
pub mod py_project;
pub mod terraform_project;
pub mod ts_infra;
pub mod ts_lambda_function;
pub mod ts_mcp_server;
pub mod ts_project;
pub mod ts_react_website;
pub mod ts_trpc_api;

pub use py_fast_api::{FastApiGenerator, FastApiOptions};
pub use py_lambda_function::{PyLambdaFunctionGenerator, PyLambdaFunctionOptions};
pub use py_project::{PyProjectGenerator, PyProjectOptions};
pub use terraform_project::{TerraformProjectGenerator, TerraformProjectOptions};
pub use ts_infra::{TsInfraGenerator, TsInfraOptions};
pub use ts_lambda_function::{TsLambdaFunctionGenerator, TsLambdaFunctionOptions};
pub use ts_mcp_server::{TsMcpServerGenerator, TsMcpServerOptions};
pub use ts_project::{TsProjectGenerator, TsProjectOptions};
pub use ts_react_website::{ReactWebsiteGenerator, ReactWebsiteOptions};
pub use ts_trpc_api::{TrpcApiGenerator, TrpcApiOptions};

pub trait Generator {
    fn info(&self) -> &'static GeneratorInfo;

    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback>;
}

/// Follow-up work a generator asks the host to do once the tree is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PostGenerateTask {
    InstallNodeDependencies,
    SyncPythonWorkspace,
}

impl PostGenerateTask {
    /// The shell command that performs this task.
    pub const fn command(&self) -> &'static str {
        match self {
            Self::InstallNodeDependencies => "pnpm install",
            Self::SyncPythonWorkspace => "uv sync --all-packages",
        }
    }
}

impl fmt::Display for PostGenerateTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Ordered, duplicate-free list of [`PostGenerateTask`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorCallback {
    tasks: Vec<PostGenerateTask>,
}

impl GeneratorCallback {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_task(mut self, task: PostGenerateTask) -> Self {
        self.push(task);
        self
    }

    pub fn push(&mut self, task: PostGenerateTask) {
        if !self.tasks.contains(&task) {
            self.tasks.push(task);
        }
    }

    /// Tasks of `other` not already present are appended in order.
    pub fn merge(mut self, other: GeneratorCallback) -> Self {
        for task in other.tasks {
            self.push(task);
        }
        self
    }

    pub fn tasks(&self) -> &[PostGenerateTask] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// The callback for a generator that may have added npm dependencies.
pub(crate) fn install_node_dependencies(skip_install: bool) -> GeneratorCallback {
    if skip_install {
        GeneratorCallback::none()
    } else {
        GeneratorCallback::none().with_task(PostGenerateTask::InstallNodeDependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_merges_without_duplicates() {
        let a = GeneratorCallback::none().with_task(PostGenerateTask::SyncPythonWorkspace);
        let b = GeneratorCallback::none()
            .with_task(PostGenerateTask::InstallNodeDependencies)
            .with_task(PostGenerateTask::SyncPythonWorkspace);
        let merged = a.merge(b);
        assert_eq!(
            merged.tasks(),
            &[
                PostGenerateTask::SyncPythonWorkspace,
                PostGenerateTask::InstallNodeDependencies
            ]
        );
        assert!(install_node_dependencies(true).is_empty());
    }
}
