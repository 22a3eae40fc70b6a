//! `py#project`: a uv-managed Python project inside the workspace's uv
//! workspace.

use tracing::{debug, info, instrument};

use crate::application::generators::{Generator, GeneratorCallback, PostGenerateTask};
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, add_dev_dependencies_to_pyproject_toml, add_gitignore_entries,
    add_project_configuration, add_uv_workspace_member, generate_files, get_npm_scope,
};
use crate::domain::names::{
    python_module_name, python_project_name, to_snake_case, validate_name,
};
use crate::domain::{
    GeneratorInfo, ProjectConfiguration, ProjectType, RenderContext, TargetConfiguration, metadata,
};
use crate::error::ForgeResult;

pub const DEFAULT_DIRECTORY: &str = "packages";

const ROOT_DEV_DEPENDENCIES: &[&str] = &["pytest", "pytest-cov", "pytest-sugar", "ruff"];

const ROOT_PYPROJECT: &str = r#"[project]
name = "{{NAME}}"
version = "0.0.0"
requires-python = ">=3.12"
dependencies = []

[dependency-groups]
dev = []

[tool.uv.workspace]
members = []

[tool.ruff]
line-length = 120
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyProjectOptions {
    pub name: String,
    pub directory: String,
    /// Directory name under `directory`. Defaults to the snake-cased name.
    pub subdirectory: Option<String>,
    pub project_type: ProjectType,
    /// Import name of the package. Defaults to `<scope>_<name>`.
    pub module_name: Option<String>,
}

impl PyProjectOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: DEFAULT_DIRECTORY.into(),
            subdirectory: None,
            project_type: ProjectType::Application,
            module_name: None,
        }
    }

    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyProjectDetails {
    /// Project and distribution name, e.g. `acme.first_api`.
    pub name: String,
    pub root: String,
    pub module: String,
}

pub struct PyProjectGenerator {
    options: PyProjectOptions,
}

impl PyProjectGenerator {
    pub fn new(options: PyProjectOptions) -> Self {
        Self { options }
    }

    #[instrument(skip_all, fields(name = %self.options.name, directory = %self.options.directory))]
    pub fn create(&self, tree: &mut Tree<'_>) -> ForgeResult<PyProjectDetails> {
        let options = &self.options;
        validate_name(&options.name)?;

        let scope = get_npm_scope(tree)?;
        let name = python_project_name(scope.as_deref(), &options.name);
        let module = options
            .module_name
            .clone()
            .unwrap_or_else(|| python_module_name(scope.as_deref(), &options.name));
        let subdirectory = options
            .subdirectory
            .clone()
            .unwrap_or_else(|| to_snake_case(&options.name));
        let root = join_path(&options.directory, &subdirectory);

        let mut project = ProjectConfiguration::new(&name, &root)
            .with_source_root(join_path(&root, &module))
            .with_project_type(options.project_type)
            .with_target(
                "install",
                TargetConfiguration::run_commands(format!("uv sync --package {name}"))
                    .cwd("{workspaceRoot}"),
            )
            .with_target(
                "compile",
                TargetConfiguration::run_commands(
                    "uv build --wheel --out-dir {workspaceRoot}/dist/{projectRoot}/build",
                )
                .cwd("{projectRoot}")
                .output("{workspaceRoot}/dist/{projectRoot}/build")
                .cached()
                .depends_on(["install"]),
            )
            .with_target(
                "lint",
                TargetConfiguration::run_commands(format!("uv run ruff check --fix ./{module} ./tests"))
                    .cwd("{projectRoot}")
                    .cached(),
            )
            .with_target(
                "format",
                TargetConfiguration::run_commands(format!("uv run ruff format ./{module} ./tests"))
                    .cwd("{projectRoot}"),
            )
            .with_target(
                "test",
                TargetConfiguration::run_commands(
                    "uv run pytest ./tests --junitxml={workspaceRoot}/reports/{projectRoot}/unittests/junit.xml",
                )
                .cwd("{projectRoot}")
                .output("{workspaceRoot}/reports/{projectRoot}/unittests")
                .cached(),
            )
            .with_target(
                "build",
                TargetConfiguration::noop().depends_on(["lint", "compile", "test"]),
            );
        project.add_generator_metadata(&metadata::PY_PROJECT);
        add_project_configuration(tree, &project)?;

        let context = RenderContext::new(&options.name)
            .with_variable("MODULE", module.as_str())
            .with_variable("PROJECT_NAME", name.as_str());
        generate_files(
            tree,
            templates::py_project::FILES,
            &root,
            &context,
            OverwriteStrategy::Overwrite,
        )?;

        ensure_uv_workspace(tree, scope.as_deref())?;
        add_uv_workspace_member(tree, &root)?;
        add_dev_dependencies_to_pyproject_toml(tree, ".", ROOT_DEV_DEPENDENCIES)?;
        add_gitignore_entries(tree, "", &[".venv", "__pycache__", ".ruff_cache"])?;

        info!(project = %name, root = %root, module = %module, "Created Python project");
        Ok(PyProjectDetails { name, root, module })
    }
}

/// Root `pyproject.toml` and `.python-version` for the uv workspace.
fn ensure_uv_workspace(tree: &mut Tree<'_>, scope: Option<&str>) -> ForgeResult<()> {
    if !tree.exists("pyproject.toml") {
        let workspace_name = match scope {
            Some(scope) => format!("{}.workspace", to_snake_case(scope)),
            None => "workspace".to_string(),
        };
        tree.write(
            "pyproject.toml",
            RenderContext::default()
                .with_variable("NAME", workspace_name)
                .render(ROOT_PYPROJECT),
        );
        debug!("Created root uv workspace");
    }
    if !tree.exists(".python-version") {
        tree.write(".python-version", "3.12\n");
    }
    Ok(())
}

impl Generator for PyProjectGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::PY_PROJECT
    }

    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        self.create(tree)?;
        Ok(GeneratorCallback::none().with_task(PostGenerateTask::SyncPythonWorkspace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workspace::{read_project_configuration, read_toml_document};

    #[test]
    fn creates_project_in_uv_workspace() {
        let mut tree = Tree::empty();
        tree.write("package.json", r#"{ "name": "@acme/source" }"#);
        let details = PyProjectGenerator::new(PyProjectOptions::new("first-api"))
            .create(&mut tree)
            .unwrap();
        assert_eq!(details.name, "acme.first_api");
        assert_eq!(details.module, "acme_first_api");
        assert_eq!(details.root, "packages/first_api");
        assert!(tree.is_file("packages/first_api/acme_first_api/hello.py"));

        let pyproject = read_toml_document(&tree, "packages/first_api/pyproject.toml").unwrap();
        assert_eq!(pyproject["project"]["name"].as_str(), Some("acme.first_api"));

        let root = read_toml_document(&tree, "pyproject.toml").unwrap();
        let members = root["tool"]["uv"]["workspace"]["members"].as_array().unwrap();
        assert_eq!(members.get(0).and_then(|m| m.as_str()), Some("packages/first_api"));
        assert_eq!(root["dependency-groups"]["dev"].as_array().unwrap().len(), 4);

        let project = read_project_configuration(&tree, "acme.first_api").unwrap();
        assert_eq!(project.source_root.as_deref(), Some("packages/first_api/acme_first_api"));
        assert!(tree.read(".gitignore").unwrap().unwrap().contains(".venv"));
    }

    #[test]
    fn unscoped_workspace() {
        let mut tree = Tree::empty();
        let callback = PyProjectGenerator::new(PyProjectOptions::new("lib"))
            .generate(&mut tree)
            .unwrap();
        assert_eq!(callback.tasks(), &[PostGenerateTask::SyncPythonWorkspace]);
        assert!(tree.is_file("packages/lib/lib/__init__.py"));
    }
}
