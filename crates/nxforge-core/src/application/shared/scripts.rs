//! The shared scripts library, `<scope>/common-scripts`.

use tracing::instrument;

use crate::application::shared::{SharedPackage, ensure_shared_ts_package, infra_config};
use crate::application::templates;
use crate::application::tree::Tree;
use crate::application::workspace::add_dependencies_to_package_json;
use crate::domain::RenderContext;
use crate::error::ForgeResult;

pub const SCRIPTS_ROOT: &str = "packages/common/scripts";

/// Create the scripts package, and the stage config package it reads, if
/// either is missing.
#[instrument(skip_all)]
pub fn ensure_scripts(tree: &mut Tree<'_>) -> ForgeResult<SharedPackage> {
    let infra_config = infra_config::ensure_infra_config(tree)?;
    let context = RenderContext::new("common-scripts")
        .with_variable("INFRA_CONFIG_PACKAGE", infra_config.name.as_str());
    let package = ensure_shared_ts_package(tree, "scripts", templates::scripts::FILES, &context)?;
    add_dependencies_to_package_json(tree, "package.json", &[], &["tsx"])?;
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workspace::get_projects;

    #[test]
    fn scripts_import_stage_config() {
        let mut tree = Tree::empty();
        tree.write("package.json", r#"{ "name": "@acme/source" }"#);
        ensure_scripts(&mut tree).unwrap();
        ensure_scripts(&mut tree).unwrap();
        assert_eq!(get_projects(&tree).unwrap().len(), 2);
        let script = tree
            .read("packages/common/scripts/src/stage-credentials.ts")
            .unwrap()
            .unwrap();
        assert!(script.contains("from '@acme/common-infra-config'"));
    }
}
