//! `ts#trpc-api`: a tRPC API deployed behind API Gateway.

use tracing::{info, instrument};

use crate::application::generators::ts_project::{
    DEFAULT_DIRECTORY, TsProjectGenerator, TsProjectOptions,
};
use crate::application::generators::{Generator, GeneratorCallback, install_node_dependencies};
use crate::application::shared::{ApiConstructOptions, add_api_construct};
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, TypeScriptBundleOptions, add_dependencies_to_package_json,
    add_typescript_bundle_target, assign_port, generate_files, resolve_iac_provider,
    update_project,
};
use crate::domain::names::validate_name;
use crate::domain::{
    ApiBackend, Auth, ComputeType, GeneratorInfo, IacProviderOption, ProjectType, RenderContext,
    TargetConfiguration, metadata,
};
use crate::error::ForgeResult;

pub const DEFAULT_PORT: u16 = 2022;

const DEPENDENCIES: &[&str] = &[
    "@aws-lambda-powertools/logger",
    "@aws-lambda-powertools/metrics",
    "@aws-lambda-powertools/tracer",
    "@trpc/server",
    "zod",
];
const DEV_DEPENDENCIES: &[&str] = &["@types/aws-lambda", "tsx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrpcApiOptions {
    pub name: String,
    pub directory: String,
    pub compute_type: ComputeType,
    pub auth: Auth,
    pub iac_provider: IacProviderOption,
    pub port: u16,
}

impl TrpcApiOptions {
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

pub struct TrpcApiGenerator {
    options: TrpcApiOptions,
}

impl TrpcApiGenerator {
    pub fn new(options: TrpcApiOptions) -> Self {
        Self { options }
    }
}

impl Generator for TrpcApiGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::TS_TRPC_API
    }

    #[instrument(skip_all, fields(name = %self.options.name))]
    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        let options = &self.options;
        validate_name(&options.name)?;
        let provider = resolve_iac_provider(tree, options.iac_provider)?;

        let project = TsProjectGenerator::new(
            TsProjectOptions::new(&options.name).with_directory(&options.directory),
        )
        .create(tree)?;

        let port = assign_port(tree, &project.name, options.port)?;
        let context = RenderContext::new(&options.name).with_variable("PORT", port.to_string());
        generate_files(
            tree,
            templates::ts_trpc_api::FILES,
            &project.root,
            &context,
            OverwriteStrategy::Overwrite,
        )?;
        add_dependencies_to_package_json(tree, "package.json", DEPENDENCIES, DEV_DEPENDENCIES)?;

        update_project(tree, &project.name, |config| {
            config.project_type = Some(ProjectType::Application);
            config.add_generator_metadata(&metadata::TS_TRPC_API);
            config.set_metadata("apiName", options.name.as_str());
            config.set_metadata("apiType", ApiBackend::Trpc.as_str());
            config.set_metadata("auth", options.auth.as_str());
            config.targets.insert(
                "serve".into(),
                TargetConfiguration::run_commands("tsx --watch src/local-server.ts")
                    .cwd("{projectRoot}")
                    .option("env", serde_json::json!({ "PORT": port.to_string() }))
                    .continuous(),
            );
            Ok(())
        })?;

        add_typescript_bundle_target(
            tree,
            &project.name,
            &TypeScriptBundleOptions::new("src/router.ts", "").with_external(["@aws-sdk/*"]),
        )?;

        add_api_construct(
            tree,
            provider,
            &ApiConstructOptions {
                api_name: options.name.clone(),
                project_name: project.name.clone(),
                project_root: project.root.clone(),
                backend: ApiBackend::Trpc,
                compute_type: options.compute_type,
                auth: options.auth,
                handler: "index.handler".into(),
            },
        )?;

        info!(
            project = %project.name,
            port,
            entry = %join_path(&project.root, "src/router.ts"),
            "Created tRPC API"
        );
        Ok(install_node_dependencies(false))
    }
}
