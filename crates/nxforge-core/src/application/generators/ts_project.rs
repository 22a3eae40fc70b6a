//! `ts#project`: a TypeScript library.

use tracing::{info, instrument};

use crate::application::generators::{Generator, GeneratorCallback, install_node_dependencies};
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, add_dependencies_to_package_json, add_project_configuration,
    add_tsconfig_path, generate_files, get_npm_scope,
};
use crate::domain::names::{offset_from_root, to_kebab_case, to_scoped_name, validate_name};
use crate::domain::{
    GeneratorInfo, ProjectConfiguration, ProjectType, RenderContext, TargetConfiguration, metadata,
};
use crate::error::ForgeResult;

pub const DEFAULT_DIRECTORY: &str = "packages";

const DEV_DEPENDENCIES: &[&str] = &[
    "@nx/eslint",
    "@nx/js",
    "@nx/vite",
    "@types/node",
    "eslint",
    "typescript",
    "vite",
    "vitest",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsProjectOptions {
    pub name: String,
    /// Parent directory of the project.
    pub directory: String,
    /// Directory name under `directory`. Defaults to the kebab-cased name.
    pub subdirectory: Option<String>,
    pub skip_install: bool,
}

impl TsProjectOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: DEFAULT_DIRECTORY.into(),
            subdirectory: None,
            skip_install: false,
        }
    }

    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_subdirectory(mut self, subdirectory: impl Into<String>) -> Self {
        self.subdirectory = Some(subdirectory.into());
        self
    }
}

/// What [`TsProjectGenerator::create`] made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsProjectDetails {
    /// Full package name, e.g. `@acme/api`.
    pub name: String,
    pub root: String,
    pub source_root: String,
}

pub struct TsProjectGenerator {
    options: TsProjectOptions,
}

impl TsProjectGenerator {
    pub fn new(options: TsProjectOptions) -> Self {
        Self { options }
    }

    /// Create the project and return its name and root.
    #[instrument(skip_all, fields(name = %self.options.name, directory = %self.options.directory))]
    pub fn create(&self, tree: &mut Tree<'_>) -> ForgeResult<TsProjectDetails> {
        let options = &self.options;
        validate_name(&options.name)?;

        let scope = get_npm_scope(tree)?;
        let kebab = to_kebab_case(&options.name);
        let name = to_scoped_name(scope.as_deref(), &kebab);
        let subdirectory = options.subdirectory.clone().unwrap_or_else(|| kebab.clone());
        let root = join_path(&options.directory, &subdirectory);
        let source_root = join_path(&root, "src");
        let offset = offset_from_root(&root);

        let mut project = ProjectConfiguration::new(&name, &root)
            .with_source_root(&source_root)
            .with_project_type(ProjectType::Library)
            .with_target(
                "compile",
                TargetConfiguration::run_commands("tsc --build tsconfig.lib.json")
                    .cwd("{projectRoot}")
                    .output("{workspaceRoot}/dist/{projectRoot}/tsc")
                    .cached(),
            )
            .with_target(
                "lint",
                TargetConfiguration::default()
                    .executor("@nx/eslint:lint")
                    .output("{options.outputFile}")
                    .cached(),
            )
            .with_target(
                "test",
                TargetConfiguration::default()
                    .executor("@nx/vite:test")
                    .option("reportsDirectory", format!("{offset}coverage/{root}"))
                    .output("{options.reportsDirectory}")
                    .cached(),
            )
            .with_target(
                "build",
                TargetConfiguration::noop().depends_on(["lint", "compile", "test"]),
            );
        project.add_generator_metadata(&metadata::TS_PROJECT);
        add_project_configuration(tree, &project)?;

        let context = RenderContext::new(&options.name)
            .with_variable("OFFSET", offset)
            .with_variable("PROJECT_ROOT", root.as_str())
            .with_variable("PROJECT_NAME", name.as_str());
        generate_files(
            tree,
            templates::ts_project::FILES,
            &root,
            &context,
            OverwriteStrategy::Overwrite,
        )?;

        let entry = join_path(&source_root, "index.ts");
        add_tsconfig_path(tree, &name, &[entry.as_str()])?;
        add_dependencies_to_package_json(tree, "package.json", &[], DEV_DEPENDENCIES)?;

        info!(project = %name, root = %root, "Created TypeScript project");
        Ok(TsProjectDetails {
            name,
            root,
            source_root,
        })
    }
}

impl Generator for TsProjectGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::TS_PROJECT
    }

    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        self.create(tree)?;
        Ok(install_node_dependencies(self.options.skip_install))
    }
}
