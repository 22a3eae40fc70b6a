//! The shared CDK constructs library, `<scope>/common-constructs`.

use tracing::instrument;

use crate::application::shared::{SharedPackage, ensure_shared_ts_package};
use crate::application::templates;
use crate::application::tree::Tree;
use crate::application::workspace::add_dependencies_to_package_json;
use crate::domain::RenderContext;
use crate::error::ForgeResult;

pub const CONSTRUCTS_ROOT: &str = "packages/common/constructs";

const DEPENDENCIES: &[&str] = &["aws-cdk-lib", "cdk-nag", "constructs"];

#[instrument(skip_all)]
pub fn ensure_shared_constructs(tree: &mut Tree<'_>) -> ForgeResult<SharedPackage> {
    let package = ensure_shared_ts_package(
        tree,
        "constructs",
        templates::constructs::SCAFFOLD,
        &RenderContext::new("common-constructs"),
    )?;
    add_dependencies_to_package_json(tree, "package.json", DEPENDENCIES, &[])?;
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workspace::get_projects;

    #[test]
    fn bootstraps_once() {
        let mut tree = Tree::empty();
        tree.write("package.json", r#"{ "name": "@acme/source" }"#);
        let first = ensure_shared_constructs(&mut tree).unwrap();
        tree.write(
            "packages/common/constructs/src/app/index.ts",
            "export * from './apis/index.js';\n",
        );
        let second = ensure_shared_constructs(&mut tree).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.name, "@acme/common-constructs");
        assert_eq!(get_projects(&tree).unwrap().len(), 1);
        assert_eq!(
            tree.read("packages/common/constructs/src/app/index.ts").unwrap().unwrap(),
            "export * from './apis/index.js';\n"
        );
        assert_eq!(
            tree.read("packages/common/constructs/src/index.ts").unwrap().unwrap(),
            "export * from './app/index.js';\nexport * from './core/index.js';\n"
        );
    }
}
