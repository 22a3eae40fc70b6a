//! `ts#mcp-server`: an MCP server inside an existing TypeScript project,
//! optionally hosted on Bedrock AgentCore.

use tracing::{info, instrument};

use crate::application::generators::ts_lambda_function::{ensure_new_component, source_root_of};
use crate::application::generators::{Generator, GeneratorCallback, install_node_dependencies};
use crate::application::shared::{AgentCoreConstructOptions, add_agent_core_construct};
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    DockerTargetOptions, OverwriteStrategy, TypeScriptBundleOptions,
    add_dependencies_to_package_json, add_docker_target, add_typescript_bundle_target,
    generate_files, next_available_port, read_project_configuration_unqualified,
    resolve_iac_provider, update_project,
};
use crate::domain::names::{strip_scope, to_class_name, to_kebab_case, validate_name};
use crate::domain::{
    ComponentMetadata, GeneratorInfo, IacProviderOption, McpComputeType, RenderContext,
    TargetConfiguration, metadata,
};
use crate::error::ForgeResult;

pub const DEFAULT_PORT: u16 = 8000;

const DEPENDENCIES: &[&str] = &["@modelcontextprotocol/sdk", "express", "zod"];
const DEV_DEPENDENCIES: &[&str] = &["@modelcontextprotocol/inspector", "@types/express", "tsx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsMcpServerOptions {
    pub project: String,
    pub name: String,
    pub compute_type: McpComputeType,
    pub iac_provider: IacProviderOption,
}

impl TsMcpServerOptions {
    pub fn new(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
            compute_type: McpComputeType::default(),
            iac_provider: IacProviderOption::default(),
        }
    }
}

pub struct TsMcpServerGenerator {
    options: TsMcpServerOptions,
}

impl TsMcpServerGenerator {
    pub fn new(options: TsMcpServerOptions) -> Self {
        Self { options }
    }
}

impl Generator for TsMcpServerGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::TS_MCP_SERVER
    }

    #[instrument(skip_all, fields(project = %self.options.project, name = %self.options.name))]
    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        let options = &self.options;
        validate_name(&options.name)?;
        let project = read_project_configuration_unqualified(tree, &options.project)?;
        let source_root = source_root_of(&project)?;
        let kebab = to_kebab_case(&options.name);
        ensure_new_component(&project, &metadata::TS_MCP_SERVER, &kebab)?;

        let server_dir = join_path(&source_root, &kebab);
        let relative_dir = server_dir
            .strip_prefix(&format!("{}/", project.root))
            .unwrap_or(&server_dir)
            .to_string();
        let port = next_available_port(tree, DEFAULT_PORT)?;
        let context = RenderContext::new(&options.name)
            .with_variable("PORT", port.to_string())
            .with_variable("PROJECT_ROOT", project.root.as_str());
        generate_files(
            tree,
            templates::ts_mcp_server::FILES,
            &server_dir,
            &context,
            OverwriteStrategy::Overwrite,
        )?;
        add_dependencies_to_package_json(tree, "package.json", DEPENDENCIES, DEV_DEPENDENCIES)?;

        let bundle_entry = format!("{relative_dir}/http.ts");
        add_typescript_bundle_target(
            tree,
            &project.name,
            &TypeScriptBundleOptions::new(bundle_entry, format!("mcp/{kebab}")),
        )?;

        update_project(tree, &project.name, |config| {
            config.add_component_generator_metadata(
                ComponentMetadata::new(&metadata::TS_MCP_SERVER, &kebab).with_port(port),
            );
            config.targets.insert(
                format!("{kebab}-serve"),
                TargetConfiguration::run_commands(format!("tsx --watch {relative_dir}/http.ts"))
                    .cwd("{projectRoot}")
                    .option("env", serde_json::json!({ "PORT": port.to_string() }))
                    .continuous(),
            );
            config.targets.insert(
                format!("{kebab}-inspect"),
                TargetConfiguration::run_commands(format!(
                    "mcp-inspector -- tsx --watch {relative_dir}/stdio.ts"
                ))
                .cwd("{projectRoot}")
                .continuous(),
            );
            Ok(())
        })?;

        match options.compute_type {
            McpComputeType::None => {}
            McpComputeType::BedrockAgentCoreRuntime => {
                let provider = resolve_iac_provider(tree, options.iac_provider)?;
                generate_files(
                    tree,
                    templates::ts_mcp_server::DOCKERFILE,
                    &server_dir,
                    &context,
                    OverwriteStrategy::Overwrite,
                )?;
                let docker_target = format!("{kebab}-docker");
                add_docker_target(
                    tree,
                    &project.name,
                    &DockerTargetOptions {
                        target_name: docker_target.clone(),
                        dockerfile_dir: relative_dir.clone(),
                        image_tag: format!("{}-{kebab}:latest", to_kebab_case(strip_scope(&project.name))),
                    },
                )?;
                add_agent_core_construct(
                    tree,
                    provider,
                    &AgentCoreConstructOptions {
                        name: format!(
                            "{}{}",
                            to_class_name(strip_scope(&project.name)),
                            to_class_name(&options.name)
                        ),
                        project_name: project.name.clone(),
                        docker_target,
                        dockerfile_dir: server_dir.clone(),
                    },
                )?;
            }
        }

        info!(project = %project.name, server = %kebab, port, "Added MCP server");
        Ok(install_node_dependencies(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::generators::ts_project::{TsProjectGenerator, TsProjectOptions};
    use crate::application::workspace::read_project_configuration;

    fn workspace() -> Tree<'static> {
        let mut tree = Tree::empty();
        tree.write("package.json", r#"{ "name": "@acme/source" }"#);
        TsProjectGenerator::new(TsProjectOptions::new("agents"))
            .create(&mut tree)
            .unwrap();
        tree
    }

    #[test]
    fn hosted_server_gets_image_and_runtime() {
        let mut tree = workspace();
        TsMcpServerGenerator::new(TsMcpServerOptions::new("agents", "calculator"))
            .generate(&mut tree)
            .unwrap();

        let project = read_project_configuration(&tree, "@acme/agents").unwrap();
        let component = &project.components()[0];
        assert_eq!(component.name, "calculator");
        assert_eq!(component.port, Some(8000));
        assert!(project.targets.contains_key("calculator-serve"));
        assert!(project.targets["docker"]
            .dependency_names()
            .any(|d| d == "calculator-docker"));

        let dockerfile = tree
            .read("packages/agents/src/calculator/Dockerfile")
            .unwrap()
            .unwrap();
        assert!(dockerfile.contains("dist/packages/agents/bundle/mcp/calculator/index.js"));
        let config = tree.read("packages/agents/rolldown.config.ts").unwrap().unwrap();
        assert!(config.contains("input: 'src/calculator/http.ts'"));

        let constructs = read_project_configuration(&tree, "@acme/common-constructs").unwrap();
        assert!(constructs.targets["build"]
            .dependency_names()
            .any(|d| d == "@acme/agents:calculator-docker"));
    }

    #[test]
    fn second_server_takes_next_port() {
        let mut tree = workspace();
        for name in ["alpha", "beta"] {
            let mut options = TsMcpServerOptions::new("agents", name);
            options.compute_type = McpComputeType::None;
            TsMcpServerGenerator::new(options).generate(&mut tree).unwrap();
        }
        let http = tree.read("packages/agents/src/beta/http.ts").unwrap().unwrap();
        assert!(http.contains("process.env.PORT ?? 8001"));
        assert!(!tree.exists("packages/common/constructs"));
        assert!(!tree.is_file("packages/agents/src/beta/Dockerfile"));
    }
}
