//! The shared Terraform modules project, `<scope>/common-terraform`.

use tracing::{debug, instrument};

use crate::application::shared::{SHARED_DIRECTORY, SharedPackage, shared_package_exists};
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{add_project_configuration, get_npm_scope};
use crate::domain::names::to_scoped_name;
use crate::domain::{ProjectConfiguration, ProjectType, TargetConfiguration};
use crate::error::ForgeResult;

pub const TERRAFORM_ROOT: &str = "packages/common/terraform";

#[instrument(skip_all)]
pub fn ensure_shared_terraform(tree: &mut Tree<'_>) -> ForgeResult<SharedPackage> {
    let root = join_path(SHARED_DIRECTORY, "terraform");
    if shared_package_exists(tree, &root) {
        return SharedPackage::read(tree, &root);
    }

    let scope = get_npm_scope(tree)?;
    let name = to_scoped_name(scope.as_deref(), "common-terraform");
    let project = ProjectConfiguration::new(&name, &root)
        .with_source_root(join_path(&root, "src"))
        .with_project_type(ProjectType::Library)
        .with_target(
            "fmt",
            TargetConfiguration::run_commands("terraform fmt -recursive")
                .cwd("{projectRoot}/src"),
        )
        .with_target(
            "validate",
            TargetConfiguration::run_commands("terraform fmt -check -recursive")
                .cwd("{projectRoot}/src")
                .cached()
                .depends_on(["fmt"]),
        )
        .with_target(
            "build",
            TargetConfiguration::noop().depends_on(["fmt", "validate"]),
        );
    add_project_configuration(tree, &project)?;

    for module_dir in ["src/core", "src/app"] {
        tree.write(&join_path(&root, &format!("{module_dir}/.gitkeep")), "");
    }
    debug!(package = %name, "Bootstrapped shared Terraform modules");
    Ok(SharedPackage { name, root })
}
