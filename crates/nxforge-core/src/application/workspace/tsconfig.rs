//! `tsconfig.base.json` path aliases.

use serde_json::{Map, Value, json};

use crate::application::tree::Tree;
use crate::application::workspace::json::{read_json_if_exists, write_json};
use crate::application::workspace::object::sort_object_keys;
use crate::domain::DomainError;
use crate::error::ForgeResult;

pub const TSCONFIG_BASE: &str = "tsconfig.base.json";

/// Map `alias` to `entries` in `compilerOptions.paths`. Keys stay sorted.
/// A missing `tsconfig.base.json` is created.
pub fn add_tsconfig_path(tree: &mut Tree<'_>, alias: &str, entries: &[&str]) -> ForgeResult<()> {
    let mut config: Value =
        read_json_if_exists(tree, TSCONFIG_BASE)?.unwrap_or_else(|| json!({ "compilerOptions": {} }));

    let shape_error = |reason: &str| DomainError::UnexpectedShape {
        path: TSCONFIG_BASE.into(),
        reason: reason.into(),
    };

    let options = config
        .as_object_mut()
        .ok_or_else(|| shape_error("expected a JSON object"))?
        .entry("compilerOptions")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| shape_error("compilerOptions is not an object"))?;
    let paths = options
        .entry("paths")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| shape_error("compilerOptions.paths is not an object"))?;

    paths.insert(
        alias.to_string(),
        Value::Array(entries.iter().map(|e| Value::String((*e).into())).collect()),
    );
    sort_object_keys(paths);

    write_json(tree, TSCONFIG_BASE, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workspace::json::read_json;

    #[test]
    fn adds_sorted_aliases() {
        let mut tree = Tree::empty();
        add_tsconfig_path(&mut tree, "@acme/zeta", &["packages/zeta/src/index.ts"]).unwrap();
        add_tsconfig_path(&mut tree, "@acme/alpha", &["packages/alpha/src/index.ts"]).unwrap();
        let config: Value = read_json(&tree, TSCONFIG_BASE).unwrap();
        let keys: Vec<_> = config["compilerOptions"]["paths"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, vec!["@acme/alpha", "@acme/zeta"]);
    }

    #[test]
    fn rejects_non_object_paths() {
        let mut tree = Tree::empty();
        tree.write(TSCONFIG_BASE, r#"{ "compilerOptions": { "paths": [] } }"#);
        let err = add_tsconfig_path(&mut tree, "@a/b", &["x"]).unwrap_err();
        assert!(err.to_string().contains("compilerOptions.paths"));
    }
}
