//! `py#lambda-function`: one more Lambda handler inside an existing Python
//! project.

use tracing::{info, instrument};

use crate::application::generators::ts_lambda_function::{ensure_new_component, source_root_of};
use crate::application::generators::{
    Generator, GeneratorCallback, PostGenerateTask, install_node_dependencies,
};
use crate::application::shared::{FunctionConstructOptions, LambdaRuntime, add_function_construct};
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, PythonBundleOptions, add_dependencies_to_pyproject_toml,
    add_python_bundle_target, generate_files, read_project_configuration_unqualified,
    resolve_iac_provider, update_project,
};
use crate::domain::names::{strip_scope, to_class_name, to_snake_case, validate_name};
use crate::domain::{
    ComponentMetadata, DomainError, EventSource, GeneratorInfo, IacProviderOption, RenderContext,
    metadata,
};
use crate::error::ForgeResult;

const DEPENDENCIES: &[&str] = &["aws-lambda-powertools[parser]", "aws-xray-sdk"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyLambdaFunctionOptions {
    pub project: String,
    pub function_name: String,
    /// Package path under the project's module, e.g. `handlers`.
    pub function_path: Option<String>,
    pub event_source: EventSource,
    pub iac_provider: IacProviderOption,
}

impl PyLambdaFunctionOptions {
    pub fn new(project: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            function_name: function_name.into(),
            function_path: None,
            event_source: EventSource::default(),
            iac_provider: IacProviderOption::default(),
        }
    }
}

pub struct PyLambdaFunctionGenerator {
    options: PyLambdaFunctionOptions,
}

impl PyLambdaFunctionGenerator {
    pub fn new(options: PyLambdaFunctionOptions) -> Self {
        Self { options }
    }
}

/// Template variables that type the handler's `event` parameter.
fn event_variables(context: RenderContext, event_source: EventSource) -> RenderContext {
    match event_source {
        EventSource::Any => context
            .with_variable("EVENT_IMPORT", "")
            .with_variable("PARSER_DECORATOR", "")
            .with_variable("EVENT_MODEL", "dict"),
        other => {
            let model = other.as_str();
            context
                .with_variable(
                    "EVENT_IMPORT",
                    format!(
                        "from aws_lambda_powertools.utilities.parser import event_parser\n\
                         from aws_lambda_powertools.utilities.parser.models import {model}"
                    ),
                )
                .with_variable("PARSER_DECORATOR", format!("@event_parser(model={model})\n"))
                .with_variable("EVENT_MODEL", model)
        }
    }
}

impl Generator for PyLambdaFunctionGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::PY_LAMBDA_FUNCTION
    }

    #[instrument(skip_all, fields(project = %self.options.project, function = %self.options.function_name))]
    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        let options = &self.options;
        validate_name(&options.function_name)?;
        let project = read_project_configuration_unqualified(tree, &options.project)?;
        let source_root = source_root_of(&project)?;
        let pyproject = join_path(&project.root, "pyproject.toml");
        if !tree.is_file(&pyproject) {
            return Err(DomainError::MissingFile { path: pyproject }.into());
        }
        let snake = to_snake_case(&options.function_name);
        ensure_new_component(&project, &metadata::PY_LAMBDA_FUNCTION, &snake)?;
        let provider = resolve_iac_provider(tree, options.iac_provider)?;

        let module = source_root.rsplit('/').next().unwrap_or(&source_root).to_string();
        let package_path = options
            .function_path
            .as_deref()
            .map(to_snake_case)
            .unwrap_or_default();
        let handler_file = join_path(&package_path, &format!("{snake}.py"));
        let context = event_variables(
            RenderContext::new(&options.function_name).with_variable("HANDLER_FILE", handler_file.as_str()),
            options.event_source,
        );
        generate_files(
            tree,
            templates::lambda_function::PY_HANDLER,
            &source_root,
            &context,
            OverwriteStrategy::Overwrite,
        )?;
        if !package_path.is_empty() {
            let init = join_path(&join_path(&source_root, &package_path), "__init__.py");
            if !tree.exists(&init) {
                tree.write(&init, "");
            }
        }

        add_dependencies_to_pyproject_toml(tree, &project.root, DEPENDENCIES)?;
        add_python_bundle_target(tree, &project.name, PythonBundleOptions::default())?;
        update_project(tree, &project.name, |config| {
            config.add_component_generator_metadata(ComponentMetadata::new(
                &metadata::PY_LAMBDA_FUNCTION,
                &snake,
            ));
            Ok(())
        })?;

        let dotted = handler_file.trim_end_matches(".py").replace('/', ".");
        add_function_construct(
            tree,
            provider,
            &FunctionConstructOptions {
                function_name: format!(
                    "{}{}",
                    to_class_name(strip_scope(&project.name)),
                    to_class_name(&options.function_name)
                ),
                project_name: project.name.clone(),
                bundle_dir: format!("dist/{}/bundle", project.root),
                runtime: LambdaRuntime::Python,
                handler: format!("{module}.{dotted}.lambda_handler"),
            },
        )?;

        info!(project = %project.name, module = %module, handler = %handler_file, "Added Python Lambda function");
        Ok(GeneratorCallback::none()
            .with_task(PostGenerateTask::SyncPythonWorkspace)
            .merge(install_node_dependencies(false)))
    }
}
