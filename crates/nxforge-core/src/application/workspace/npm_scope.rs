//! The workspace npm scope.

use serde_json::Value;

use crate::application::tree::Tree;
use crate::application::workspace::json::read_json_if_exists;
use crate::error::ForgeResult;

/// Scope of the root `package.json` name, without the `@`.
///
/// `@acme/source` → `Some("acme")`. An unscoped or missing name, or a
/// missing `package.json`, yields `None`.
pub fn get_npm_scope(tree: &Tree<'_>) -> ForgeResult<Option<String>> {
    let Some(package): Option<Value> = read_json_if_exists(tree, "package.json")? else {
        return Ok(None);
    };
    Ok(package
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.strip_prefix('@'))
        .and_then(|rest| rest.split_once('/'))
        .map(|(scope, _)| scope.to_string())
        .filter(|scope| !scope.is_empty()))
}
