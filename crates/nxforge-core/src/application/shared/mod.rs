//! Shared packages under `packages/common`.
//!
//! Several generators contribute to the same few workspace-wide packages:
//! one CDK constructs library (or one Terraform modules project), one
//! stage config library, one scripts library. Each bootstrapper creates its
//! package the first time it is needed and afterwards only appends to it,
//! so running any number of generators leaves exactly one copy.

pub mod agent_core_constructs;
pub mod api_constructs;
pub mod constructs;
pub mod function_constructs;
pub mod infra_config;
pub mod scripts;
pub mod static_website_constructs;
pub mod terraform;

use tracing::debug;

use crate::application::generators::ts_project::{TsProjectGenerator, TsProjectOptions};
use crate::application::templates::TemplateFile;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, add_star_export, ensure_dependency, generate_files, read_json,
    update_project,
};
use crate::domain::names::offset_from_root;
use crate::domain::{ProjectConfiguration, RenderContext};
use crate::error::ForgeResult;

pub use agent_core_constructs::{AgentCoreConstructOptions, add_agent_core_construct};
pub use api_constructs::{ApiConstructOptions, add_api_construct};
pub use constructs::{CONSTRUCTS_ROOT, ensure_shared_constructs};
pub use function_constructs::{FunctionConstructOptions, add_function_construct};
pub use infra_config::{INFRA_CONFIG_ROOT, ensure_infra_config};
pub use scripts::{SCRIPTS_ROOT, ensure_scripts};
pub use static_website_constructs::{StaticWebsiteConstructOptions, add_static_website_construct};
pub use terraform::{TERRAFORM_ROOT, ensure_shared_terraform};

pub const SHARED_DIRECTORY: &str = "packages/common";

/// A shared package, by name and root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedPackage {
    pub name: String,
    pub root: String,
}

impl SharedPackage {
    fn read(tree: &Tree<'_>, root: &str) -> ForgeResult<Self> {
        let project: ProjectConfiguration = read_json(tree, &join_path(root, "project.json"))?;
        Ok(Self {
            name: project.name,
            root: root.to_string(),
        })
    }

    /// Depend this package's `build` on `dependency`.
    pub fn depend_build_on(&self, tree: &mut Tree<'_>, dependency: &str) -> ForgeResult<()> {
        update_project(tree, &self.name, |project| {
            ensure_dependency(project, "build", dependency);
            Ok(())
        })
    }
}

/// Whether a shared package has already been created at `root`.
pub fn shared_package_exists(tree: &Tree<'_>, root: &str) -> bool {
    tree.exists(&join_path(root, "project.json"))
}

/// Create the TypeScript library `packages/common/<dir>` named
/// `common-<dir>` unless it exists. The default `ts#project` source is
/// replaced by `scaffold`.
pub(crate) fn ensure_shared_ts_package(
    tree: &mut Tree<'_>,
    dir: &str,
    scaffold: &[TemplateFile],
    context: &RenderContext,
) -> ForgeResult<SharedPackage> {
    let root = join_path(SHARED_DIRECTORY, dir);
    if shared_package_exists(tree, &root) {
        return SharedPackage::read(tree, &root);
    }

    let mut options = TsProjectOptions::new(format!("common-{dir}"))
        .with_directory(SHARED_DIRECTORY)
        .with_subdirectory(dir);
    options.skip_install = true;
    let details = TsProjectGenerator::new(options).create(tree)?;

    tree.delete(&details.source_root)?;
    generate_files(tree, scaffold, &details.root, context, OverwriteStrategy::Overwrite)?;
    debug!(package = %details.name, "Bootstrapped shared package");

    Ok(SharedPackage {
        name: details.name,
        root: details.root,
    })
}

/// Export `./<group>/index.js` from `src/app/index.ts` and `./<module>.js`
/// from `src/app/<group>/index.ts`.
pub(crate) fn export_app_module(
    tree: &mut Tree<'_>,
    package: &SharedPackage,
    group: &str,
    module: &str,
) -> ForgeResult<()> {
    let app_index = join_path(&package.root, "src/app/index.ts");
    add_star_export(tree, &app_index, &format!("./{group}/index.js"))?;
    let group_index = join_path(&package.root, &format!("src/app/{group}/index.ts"));
    add_star_export(tree, &group_index, &format!("./{module}.js"))?;
    Ok(())
}

/// Export `./<module>.js` from `src/core/index.ts`.
pub(crate) fn export_core_module(
    tree: &mut Tree<'_>,
    package: &SharedPackage,
    module: &str,
) -> ForgeResult<()> {
    let core_index = join_path(&package.root, "src/core/index.ts");
    add_star_export(tree, &core_index, &format!("./{module}.js"))?;
    Ok(())
}

/// Path from the compiled `src/app/<group>/` module of the constructs
/// package to `target` (workspace-relative).
pub(crate) fn cdk_asset_path(package: &SharedPackage, group: &str, target: &str) -> String {
    let compiled_dir = format!("dist/{}/tsc/app/{group}", package.root);
    format!("{}{target}", offset_from_root(&compiled_dir))
}

/// Path from a Terraform app module `src/app/<group>/<name>/` to `target`.
pub(crate) fn terraform_asset_path(package: &SharedPackage, group: &str, name: &str, target: &str) -> String {
    let module_dir = format!("{}/src/app/{group}/{name}", package.root);
    format!("${{path.module}}/{}{target}", offset_from_root(&module_dir))
}

/// Relative source of the core modules from `src/app/<group>/<name>/`.
pub(crate) const TERRAFORM_CORE_OFFSET: &str = "../../../core/";

/// Lambda runtime of a deployed handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaRuntime {
    Node,
    Python,
}

impl LambdaRuntime {
    pub const fn cdk(&self) -> &'static str {
        match self {
            Self::Node => "Runtime.NODEJS_22_X",
            Self::Python => "Runtime.PYTHON_3_12",
        }
    }

    pub const fn terraform(&self) -> &'static str {
        match self {
            Self::Node => "nodejs22.x",
            Self::Python => "python3.12",
        }
    }
}
