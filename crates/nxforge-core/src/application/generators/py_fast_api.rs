//! `py#fast-api`: a FastAPI project deployed behind API Gateway.

use tracing::{info, instrument};

use crate::application::generators::py_project::{
    DEFAULT_DIRECTORY, PyProjectGenerator, PyProjectOptions,
};
use crate::application::generators::{
    Generator, GeneratorCallback, PostGenerateTask, install_node_dependencies,
};
use crate::application::shared::{ApiConstructOptions, add_api_construct};
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, PythonBundleOptions, add_dependencies_to_pyproject_toml,
    add_dev_dependencies_to_pyproject_toml, add_python_bundle_target, assign_port,
    generate_files, resolve_iac_provider, update_project,
};
use crate::domain::names::validate_name;
use crate::domain::{
    ApiBackend, Auth, ComputeType, GeneratorInfo, IacProviderOption, ProjectType, RenderContext,
    TargetConfiguration, metadata,
};
use crate::error::ForgeResult;

pub const DEFAULT_PORT: u16 = 8000;

const DEPENDENCIES: &[&str] = &["fastapi", "mangum", "aws-lambda-powertools[parser]", "boto3"];
const DEV_DEPENDENCIES: &[&str] = &["fastapi[standard]"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastApiOptions {
    pub name: String,
    pub directory: String,
    pub compute_type: ComputeType,
    pub auth: Auth,
    pub iac_provider: IacProviderOption,
    /// Lowest port the local `serve` target may take.
    pub port: u16,
}

impl FastApiOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: DEFAULT_DIRECTORY.into(),
            compute_type: ComputeType::default(),
            auth: Auth::default(),
            iac_provider: IacProviderOption::default(),
            port: DEFAULT_PORT,
        }
    }
}

pub struct FastApiGenerator {
    options: FastApiOptions,
}

impl FastApiGenerator {
    pub fn new(options: FastApiOptions) -> Self {
        Self { options }
    }
}

impl Generator for FastApiGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::PY_FAST_API
    }

    #[instrument(skip_all, fields(name = %self.options.name))]
    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        let options = &self.options;
        validate_name(&options.name)?;
        let provider = resolve_iac_provider(tree, options.iac_provider)?;

        let project = PyProjectGenerator::new(
            PyProjectOptions::new(&options.name)
                .with_directory(&options.directory)
                .with_project_type(ProjectType::Application),
        )
        .create(tree)?;

        tree.delete(&join_path(&project.root, &format!("{}/hello.py", project.module)))?;
        tree.delete(&join_path(&project.root, "tests/test_hello.py"))?;
        let context = RenderContext::new(&options.name).with_variable("MODULE", project.module.as_str());
        generate_files(
            tree,
            templates::py_fast_api::FILES,
            &project.root,
            &context,
            OverwriteStrategy::Overwrite,
        )?;

        add_dependencies_to_pyproject_toml(tree, &project.root, DEPENDENCIES)?;
        add_dev_dependencies_to_pyproject_toml(tree, &project.root, DEV_DEPENDENCIES)?;

        let port = assign_port(tree, &project.name, options.port)?;
        let module = project.module.clone();
        update_project(tree, &project.name, |config| {
            config.add_generator_metadata(&metadata::PY_FAST_API);
            config.set_metadata("apiName", options.name.as_str());
            config.set_metadata("apiType", ApiBackend::FastApi.as_str());
            config.set_metadata("auth", options.auth.as_str());
            config.targets.insert(
                "serve".into(),
                TargetConfiguration::run_commands(format!(
                    "uv run fastapi dev {module}/main.py --port {port}"
                ))
                .cwd("{projectRoot}")
                .continuous(),
            );
            Ok(())
        })?;
        add_python_bundle_target(tree, &project.name, PythonBundleOptions::default())?;

        add_api_construct(
            tree,
            provider,
            &ApiConstructOptions {
                api_name: options.name.clone(),
                project_name: project.name.clone(),
                project_root: project.root.clone(),
                backend: ApiBackend::FastApi,
                compute_type: options.compute_type,
                auth: options.auth,
                handler: format!("{}.main.handler", project.module),
            },
        )?;

        info!(project = %project.name, port, provider = %provider, "Created FastAPI project");
        Ok(GeneratorCallback::none()
            .with_task(PostGenerateTask::SyncPythonWorkspace)
            .merge(install_node_dependencies(false)))
    }
}
