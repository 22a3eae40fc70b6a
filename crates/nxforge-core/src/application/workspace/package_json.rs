//! npm dependency declarations.

use serde_json::{Map, Value};
use tracing::debug;

use crate::application::tree::Tree;
use crate::application::workspace::json::update_json;
use crate::application::workspace::object::sort_object_keys;
use crate::domain::{DomainError, versions};
use crate::error::ForgeResult;

/// Add pinned `dependencies` and `devDependencies` to the `package.json`
/// at `path`. Existing entries for the same packages are overwritten, and
/// both maps end up sorted by key.
pub fn add_dependencies_to_package_json(
    tree: &mut Tree<'_>,
    path: &str,
    dependencies: &[&str],
    dev_dependencies: &[&str],
) -> ForgeResult<()> {
    let dependencies = versions::with_versions(dependencies)?;
    let dev_dependencies = versions::with_versions(dev_dependencies)?;

    update_json(tree, path, |package: &mut Value| {
        let Some(package) = package.as_object_mut() else {
            return Err(DomainError::UnexpectedShape {
                path: path.to_string(),
                reason: "expected a JSON object".into(),
            }
            .into());
        };
        merge_section(package, "dependencies", dependencies);
        merge_section(package, "devDependencies", dev_dependencies);
        Ok(())
    })?;

    debug!(path, "Updated package.json dependencies");
    Ok(())
}

fn merge_section(
    package: &mut Map<String, Value>,
    key: &str,
    entries: std::collections::BTreeMap<String, String>,
) {
    if entries.is_empty() {
        return;
    }
    let section = package
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !section.is_object() {
        *section = Value::Object(Map::new());
    }
    if let Value::Object(section) = section {
        for (name, version) in entries {
            section.insert(name, Value::String(version));
        }
        sort_object_keys(section);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workspace::json::read_json;

    #[test]
    fn adds_sorted_pinned_dependencies() {
        let mut tree = Tree::empty();
        tree.write(
            "package.json",
            r#"{ "name": "@acme/source", "devDependencies": { "zod": "1.0.0", "aws-cdk": "0" } }"#,
        );
        add_dependencies_to_package_json(&mut tree, "package.json", &["constructs"], &["zod"])
            .unwrap();

        let package: Value = read_json(&tree, "package.json").unwrap();
        let dev: Vec<_> = package["devDependencies"].as_object().unwrap().keys().collect();
        assert_eq!(dev, vec!["aws-cdk", "zod"]);
        assert_eq!(package["devDependencies"]["zod"], versions::ts_version("zod").unwrap());
        assert_eq!(
            package["dependencies"]["constructs"],
            versions::ts_version("constructs").unwrap()
        );
    }

    #[test]
    fn unknown_package_fails_before_writing() {
        let mut tree = Tree::empty();
        tree.write("package.json", "{}");
        assert!(add_dependencies_to_package_json(&mut tree, "package.json", &["left-pad"], &[]).is_err());
        assert_eq!(tree.read("package.json").unwrap().unwrap(), "{}");
    }
}
