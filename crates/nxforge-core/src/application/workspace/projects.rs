//! Project discovery and `project.json` edits.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::application::ports::IGNORED_DIRS;
use crate::application::tree::Tree;
use crate::application::workspace::json::{read_json, write_json};
use crate::domain::names::strip_scope;
use crate::domain::{DomainError, EdgeInsertion, ProjectConfiguration};
use crate::error::ForgeResult;

const PROJECT_FILE: &str = "project.json";

fn in_ignored_dir(path: &str) -> bool {
    path.split('/').any(|segment| IGNORED_DIRS.contains(&segment))
}

fn root_of(config_path: &str) -> &str {
    config_path
        .strip_suffix(PROJECT_FILE)
        .map(|root| root.trim_end_matches('/'))
        .unwrap_or_default()
}

fn load(tree: &Tree<'_>, config_path: &str) -> ForgeResult<ProjectConfiguration> {
    let mut project: ProjectConfiguration = read_json(tree, config_path)?;
    let root = root_of(config_path);
    if project.root.is_empty() {
        project.root = if root.is_empty() { ".".into() } else { root.into() };
    }
    if project.name.is_empty() {
        project.name = root.rsplit('/').next().unwrap_or(root).to_string();
    }
    Ok(project)
}

/// Every project in the workspace, keyed by name.
pub fn get_projects(tree: &Tree<'_>) -> ForgeResult<BTreeMap<String, ProjectConfiguration>> {
    let mut projects = BTreeMap::new();
    for path in tree.list_files("")? {
        let is_project_file =
            path == PROJECT_FILE || path.ends_with(&format!("/{PROJECT_FILE}"));
        if !is_project_file || in_ignored_dir(&path) {
            continue;
        }
        let project = load(tree, &path)?;
        if let Some(previous) = projects.insert(project.name.clone(), project) {
            warn!(name = %previous.name, root = %previous.root, "Duplicate project name");
        }
    }
    Ok(projects)
}

/// Look a project up by its exact name.
pub fn read_project_configuration(tree: &Tree<'_>, name: &str) -> ForgeResult<ProjectConfiguration> {
    get_projects(tree)?
        .remove(name)
        .ok_or_else(|| DomainError::ProjectNotFound { name: name.into() }.into())
}

/// Bare name of a project: no npm scope, no Python `scope.` prefix.
fn unqualified(name: &str) -> &str {
    let bare = strip_scope(name);
    bare.split_once('.').map_or(bare, |(_, rest)| rest)
}

/// Look a project up by exact name, then by name without its npm or Python
/// scope (`@acme/api`, `api` and `acme.api` all find `@acme/api`).
pub fn read_project_configuration_unqualified(
    tree: &Tree<'_>,
    name: &str,
) -> ForgeResult<ProjectConfiguration> {
    let mut projects = get_projects(tree)?;
    if let Some(project) = projects.remove(name) {
        return Ok(project);
    }

    let wanted = unqualified(name);
    let mut matches: Vec<ProjectConfiguration> = projects
        .into_values()
        .filter(|p| unqualified(&p.name) == wanted)
        .collect();
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(DomainError::ProjectNotFound { name: name.into() }.into()),
        _ => {
            warn!(name, candidates = matches.len(), "Ambiguous project name");
            Err(DomainError::ProjectNotFound { name: name.into() }.into())
        }
    }
}

/// Write `project` to `<root>/project.json`.
pub fn update_project_configuration(
    tree: &mut Tree<'_>,
    project: &ProjectConfiguration,
) -> ForgeResult<()> {
    write_json(tree, &project.config_path(), project)
}

/// Write a new project. Fails if the name is taken or the root already has
/// a `project.json`.
pub fn add_project_configuration(
    tree: &mut Tree<'_>,
    project: &ProjectConfiguration,
) -> ForgeResult<()> {
    let projects = get_projects(tree)?;
    if let Some(existing) = projects.get(&project.name) {
        return Err(DomainError::ProjectExists {
            name: project.name.clone(),
            root: existing.root.clone(),
        }
        .into());
    }
    if tree.exists(&project.config_path()) {
        return Err(DomainError::ProjectExists {
            name: project.name.clone(),
            root: project.root.clone(),
        }
        .into());
    }
    debug!(name = %project.name, root = %project.root, "Adding project");
    update_project_configuration(tree, project)
}

/// Read a project (by unqualified name), apply `update`, and write it back.
pub fn update_project<R, F>(tree: &mut Tree<'_>, name: &str, update: F) -> ForgeResult<R>
where
    F: FnOnce(&mut ProjectConfiguration) -> ForgeResult<R>,
{
    let mut project = read_project_configuration_unqualified(tree, name)?;
    let result = update(&mut project)?;
    update_project_configuration(tree, &project)?;
    Ok(result)
}

/// Add a `dependsOn` edge, warning when an equivalent edge is spelled
/// differently.
pub fn ensure_dependency(project: &mut ProjectConfiguration, target: &str, dependency: &str) {
    match project.add_dependency_to_target_if_not_present(target, dependency) {
        EdgeInsertion::Added => {
            debug!(project = %project.name, target_name = target, dependency, "Added target dependency");
        }
        EdgeInsertion::AlreadyPresent => {}
        EdgeInsertion::AddedAlongside { existing } => warn!(
            project = %project.name,
            target_name = target,
            dependency,
            existing = %existing,
            "Target already depends on a differently spelled reference to the same target"
        ),
    }
}
