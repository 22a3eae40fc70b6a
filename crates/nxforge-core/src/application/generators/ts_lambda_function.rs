//! `ts#lambda-function`: one more Lambda handler inside an existing
//! TypeScript project.

use tracing::{info, instrument};

use crate::application::generators::{Generator, GeneratorCallback, install_node_dependencies};
use crate::application::shared::{FunctionConstructOptions, LambdaRuntime, add_function_construct};
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, TypeScriptBundleOptions, add_dependencies_to_package_json,
    add_typescript_bundle_target, generate_files, read_project_configuration_unqualified,
    resolve_iac_provider, update_project,
};
use crate::domain::names::{strip_scope, to_camel_case, to_class_name, to_kebab_case, validate_name};
use crate::domain::{
    ComponentMetadata, DomainError, EventSource, GeneratorInfo, IacProviderOption,
    ProjectConfiguration, RenderContext, metadata,
};
use crate::error::ForgeResult;

const DEPENDENCIES: &[&str] = &[
    "@aws-lambda-powertools/logger",
    "@aws-lambda-powertools/metrics",
    "@aws-lambda-powertools/tracer",
];
const DEV_DEPENDENCIES: &[&str] = &["@types/aws-lambda"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsLambdaFunctionOptions {
    /// Project that receives the handler.
    pub project: String,
    pub function_name: String,
    /// Directory under the project's source root. Defaults to the root itself.
    pub function_path: Option<String>,
    pub event_source: EventSource,
    pub iac_provider: IacProviderOption,
}

impl TsLambdaFunctionOptions {
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

pub struct TsLambdaFunctionGenerator {
    options: TsLambdaFunctionOptions,
}

impl TsLambdaFunctionGenerator {
    pub fn new(options: TsLambdaFunctionOptions) -> Self {
        Self { options }
    }
}

/// The source root, or the error every component generator reports when
/// it is missing.
pub(crate) fn source_root_of(project: &ProjectConfiguration) -> ForgeResult<String> {
    project
        .source_root
        .clone()
        .ok_or_else(|| DomainError::MissingSourceRoot {
            project: project.name.clone(),
        }
        .into())
}

/// Fail when `project` already has a component of this generator and name.
pub(crate) fn ensure_new_component(
    project: &ProjectConfiguration,
    info: &GeneratorInfo,
    name: &str,
) -> ForgeResult<()> {
    if project
        .components()
        .iter()
        .any(|c| c.generator == info.id && c.name == name)
    {
        return Err(DomainError::ComponentExists {
            project: project.name.clone(),
            name: name.into(),
        }
        .into());
    }
    Ok(())
}

/// `aws-lambda` type names to import for a handler typed for `event_source`.
fn event_imports(event_source: EventSource) -> String {
    match event_source {
        EventSource::Any => "Context".into(),
        other => {
            let ty = other.ts_type();
            let base = ty.split_once('<').map_or(ty, |(base, _)| base);
            format!("{base}, Context")
        }
    }
}

impl Generator for TsLambdaFunctionGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::TS_LAMBDA_FUNCTION
    }

    #[instrument(skip_all, fields(project = %self.options.project, function = %self.options.function_name))]
    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        let options = &self.options;
        validate_name(&options.function_name)?;
        let project = read_project_configuration_unqualified(tree, &options.project)?;
        let source_root = source_root_of(&project)?;
        let kebab = to_kebab_case(&options.function_name);
        ensure_new_component(&project, &metadata::TS_LAMBDA_FUNCTION, &kebab)?;
        let provider = resolve_iac_provider(tree, options.iac_provider)?;

        let handler_file = join_path(
            options.function_path.as_deref().unwrap_or_default(),
            &format!("{kebab}.ts"),
        );
        let context = RenderContext::new(&options.function_name)
            .with_variable("HANDLER_FILE", handler_file.as_str())
            .with_variable("NAME_CAMEL", to_camel_case(&options.function_name))
            .with_variable("EVENT_TYPE", options.event_source.ts_type())
            .with_variable("EVENT_IMPORTS", event_imports(options.event_source))
            .with_variable("PROJECT_NAME", project.name.as_str());
        generate_files(
            tree,
            templates::lambda_function::TS_HANDLER,
            &source_root,
            &context,
            OverwriteStrategy::Overwrite,
        )?;
        add_dependencies_to_package_json(tree, "package.json", DEPENDENCIES, DEV_DEPENDENCIES)?;

        let entry = join_path(&source_root, &handler_file);
        let relative_entry = entry
            .strip_prefix(&format!("{}/", project.root))
            .unwrap_or(&entry)
            .to_string();
        let bundle_subdir = format!("lambda/{kebab}");
        add_typescript_bundle_target(
            tree,
            &project.name,
            &TypeScriptBundleOptions::new(relative_entry, &bundle_subdir).with_external(["@aws-sdk/*"]),
        )?;

        update_project(tree, &project.name, |config| {
            config.add_component_generator_metadata(ComponentMetadata::new(
                &metadata::TS_LAMBDA_FUNCTION,
                &kebab,
            ));
            Ok(())
        })?;

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
                bundle_dir: format!("dist/{}/bundle/{bundle_subdir}", project.root),
                runtime: LambdaRuntime::Node,
                handler: "index.handler".into(),
            },
        )?;

        info!(project = %project.name, handler = %entry, "Added TypeScript Lambda function");
        Ok(install_node_dependencies(false))
    }
}
