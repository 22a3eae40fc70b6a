//! Format-preserving `pyproject.toml` edits.

use toml_edit::{Array, DocumentMut, Item, Table, value};
use tracing::debug;

use crate::application::tree::{Tree, join_path};
use crate::domain::pep508::{self, MergeStep};
use crate::domain::{DomainError, versions};
use crate::error::ForgeResult;

pub const PYPROJECT: &str = "pyproject.toml";

pub fn read_toml_document(tree: &Tree<'_>, path: &str) -> ForgeResult<DocumentMut> {
    let content = tree.read_required(path)?;
    content.parse::<DocumentMut>().map_err(|e| {
        DomainError::ParseFailed {
            path: path.to_string(),
            format: "toml",
            reason: e.to_string(),
        }
        .into()
    })
}

pub fn write_toml_document(tree: &mut Tree<'_>, path: &str, document: &DocumentMut) {
    tree.write(path, document.to_string());
}

fn shape_error(path: &str, reason: impl Into<String>) -> DomainError {
    DomainError::UnexpectedShape {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// The table at `keys`, created (as a standard table) where missing.
fn table_at<'d>(document: &'d mut DocumentMut, path: &str, keys: &[&str]) -> ForgeResult<&'d mut Table> {
    let mut table = document.as_table_mut();
    for key in keys {
        let item = table.entry(key).or_insert_with(|| {
            let mut t = Table::new();
            t.set_implicit(true);
            Item::Table(t)
        });
        table = item
            .as_table_mut()
            .ok_or_else(|| shape_error(path, format!("[{key}] is not a table")))?;
    }
    Ok(table)
}

/// The array at `table[key]`, created empty where missing.
fn array_at<'t>(table: &'t mut Table, path: &str, key: &str) -> ForgeResult<&'t mut Array> {
    let item = table.entry(key).or_insert_with(|| value(Array::new()));
    item.as_array_mut()
        .ok_or_else(|| shape_error(path, format!("{key} is not an array")).into())
}

/// Apply the requirement merge to `array`, keeping each replaced entry's
/// comments and whitespace.
fn merge_into_array(array: &mut Array, requirements: &[String]) {
    let existing: Vec<String> = array
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect();
    for step in pep508::plan_merge(&existing, requirements) {
        match step {
            MergeStep::Replace(index, requirement) => {
                let previous = array.replace(index, requirement);
                if let Some(slot) = array.get_mut(index) {
                    *slot.decor_mut() = previous.decor().clone();
                }
            }
            MergeStep::Append(requirement) => array.push(requirement),
        }
    }
    one_per_line(array);
}

fn one_per_line(array: &mut Array) {
    if array.is_empty() {
        return;
    }
    for item in array.iter_mut() {
        let on_own_line = item
            .decor()
            .prefix()
            .and_then(|p| p.as_str())
            .is_some_and(|p| p.contains('\n'));
        if !on_own_line {
            item.decor_mut().set_prefix("\n  ");
            item.decor_mut().set_suffix("");
        }
    }
    array.set_trailing_comma(true);
    if !array.trailing().as_str().is_some_and(|t| t.contains('\n')) {
        array.set_trailing("\n");
    }
}

/// Add pinned runtime dependencies to `<project_root>/pyproject.toml`
/// `[project].dependencies`.
pub fn add_dependencies_to_pyproject_toml(
    tree: &mut Tree<'_>,
    project_root: &str,
    dependencies: &[&str],
) -> ForgeResult<()> {
    let requirements = versions::with_py_versions(dependencies)?;
    let path = join_path(project_root, PYPROJECT);
    let mut document = read_toml_document(tree, &path)?;
    {
        let project = table_at(&mut document, &path, &["project"])?;
        let array = array_at(project, &path, "dependencies")?;
        merge_into_array(array, &requirements);
    }
    debug!(path = %path, count = requirements.len(), "Merged Python dependencies");
    write_toml_document(tree, &path, &document);
    Ok(())
}

/// Add pinned development dependencies to `[dependency-groups].dev`.
pub fn add_dev_dependencies_to_pyproject_toml(
    tree: &mut Tree<'_>,
    project_root: &str,
    dependencies: &[&str],
) -> ForgeResult<()> {
    let requirements = versions::with_py_versions(dependencies)?;
    let path = join_path(project_root, PYPROJECT);
    let mut document = read_toml_document(tree, &path)?;
    {
        let groups = table_at(&mut document, &path, &["dependency-groups"])?;
        let array = array_at(groups, &path, "dev")?;
        merge_into_array(array, &requirements);
    }
    write_toml_document(tree, &path, &document);
    Ok(())
}

/// Add `member` to the root `[tool.uv.workspace].members`, once.
pub fn add_uv_workspace_member(tree: &mut Tree<'_>, member: &str) -> ForgeResult<()> {
    let path = PYPROJECT;
    let mut document = read_toml_document(tree, path)?;
    {
        let workspace = table_at(&mut document, path, &["tool", "uv", "workspace"])?;
        let members = array_at(workspace, path, "members")?;
        if members.iter().any(|m| m.as_str() == Some(member)) {
            return Ok(());
        }
        members.push(member);
        one_per_line(members);
    }
    debug!(member, "Added uv workspace member");
    write_toml_document(tree, path, &document);
    Ok(())
}
