//! Bedrock AgentCore runtime hosting for container-built servers.

use tracing::{info, instrument};

use crate::application::shared::constructs::ensure_shared_constructs;
use crate::application::shared::terraform::ensure_shared_terraform;
use crate::application::shared::{
    SharedPackage, TERRAFORM_CORE_OFFSET, cdk_asset_path, export_app_module, export_core_module,
};
use crate::application::templates;
use crate::application::tree::Tree;
use crate::application::workspace::{OverwriteStrategy, generate_files};
use crate::domain::names::to_kebab_case;
use crate::domain::{IacProvider, RenderContext};
use crate::error::ForgeResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCoreConstructOptions {
    pub name: String,
    pub project_name: String,
    /// Target building the image, e.g. `my-server-docker`.
    pub docker_target: String,
    /// Directory holding the `Dockerfile`, workspace-relative.
    pub dockerfile_dir: String,
}

#[instrument(skip_all, fields(name = %options.name, provider = %provider))]
pub fn add_agent_core_construct(
    tree: &mut Tree<'_>,
    provider: IacProvider,
    options: &AgentCoreConstructOptions,
) -> ForgeResult<SharedPackage> {
    let name = to_kebab_case(&options.name);
    let package = match provider {
        IacProvider::Cdk => {
            let package = ensure_shared_constructs(tree)?;
            generate_files(
                tree,
                templates::constructs::AGENT_CORE_RUNTIME,
                &package.root,
                &RenderContext::default(),
                OverwriteStrategy::KeepExisting,
            )?;
            export_core_module(tree, &package, "agent-core/runtime")?;

            let context = RenderContext::new(&options.name).with_variable(
                "DOCKER_DIR",
                cdk_asset_path(&package, "mcp-servers", &options.dockerfile_dir),
            );
            generate_files(
                tree,
                templates::constructs::MCP_SERVER,
                &package.root,
                &context,
                OverwriteStrategy::Overwrite,
            )?;
            export_app_module(tree, &package, "mcp-servers", &name)?;
            package
        }
        IacProvider::Terraform => {
            let package = ensure_shared_terraform(tree)?;
            generate_files(
                tree,
                templates::terraform::AGENT_CORE_RUNTIME,
                &package.root,
                &RenderContext::default(),
                OverwriteStrategy::KeepExisting,
            )?;
            let context = RenderContext::new(&options.name)
                .with_variable("CORE_OFFSET", TERRAFORM_CORE_OFFSET);
            generate_files(
                tree,
                templates::terraform::MCP_SERVER,
                &package.root,
                &context,
                OverwriteStrategy::Overwrite,
            )?;
            package
        }
    };

    package.depend_build_on(tree, &format!("{}:{}", options.project_name, options.docker_target))?;
    info!(package = %package.name, "Added AgentCore runtime construct");
    Ok(package)
}
