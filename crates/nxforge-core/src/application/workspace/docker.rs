//! Container image targets.

use tracing::instrument;

use crate::application::tree::join_path;
use crate::application::tree::Tree;
use crate::application::workspace::bundle::BUNDLE_TARGET;
use crate::application::workspace::projects::{ensure_dependency, update_project};
use crate::domain::TargetConfiguration;
use crate::error::ForgeResult;

pub const DOCKER_TARGET: &str = "docker";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerTargetOptions {
    /// Name of the new target, e.g. `my-server-docker`.
    pub target_name: String,
    /// Directory holding the `Dockerfile`, relative to the project root.
    pub dockerfile_dir: String,
    pub image_tag: String,
}

/// Add a `docker build` target for one image, wired as
/// `build → docker → <target_name> → bundle`.
#[instrument(skip(tree), fields(target_name = %options.target_name))]
pub fn add_docker_target(
    tree: &mut Tree<'_>,
    project_name: &str,
    options: &DockerTargetOptions,
) -> ForgeResult<()> {
    update_project(tree, project_name, |project| {
        let dockerfile_dir = join_path(&project.root, &options.dockerfile_dir);
        project.add_target_if_not_present(
            &options.target_name,
            TargetConfiguration::run_commands(format!(
                "docker build --platform linux/arm64 -t {tag} {dockerfile_dir} --build-context workspace=.",
                tag = options.image_tag,
            ))
            .option("cwd", "{workspaceRoot}")
            .depends_on([BUNDLE_TARGET]),
        );
        ensure_dependency(project, DOCKER_TARGET, &options.target_name);
        ensure_dependency(project, "build", DOCKER_TARGET);
        Ok(())
    })
}
