//! Nx project configuration (`project.json`) model.
//!
//! Fields this crate does not understand are kept in `extra` maps and
//! written back unchanged, so hand-edited project files survive a
//! generator run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::target_graph::{self, EdgeInsertion};
use crate::domain::value_objects::ProjectType;

/// Executor used by every shell-command target.
pub const RUN_COMMANDS: &str = "nx:run-commands";

/// One project's `project.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfiguration {
    pub name: String,

    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Workspace-relative project directory. Filled from the file location
    /// when `project.json` omits it.
    #[serde(default)]
    pub root: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Free-form metadata: generator provenance, components, ports.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,

    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfiguration>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectConfiguration {
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            name: name.into(),
            schema: Some(schema_path(&root)),
            root,
            ..Self::default()
        }
    }

    pub fn with_source_root(mut self, source_root: impl Into<String>) -> Self {
        self.source_root = Some(source_root.into());
        self
    }

    pub fn with_project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = Some(project_type);
        self
    }

    pub fn with_target(mut self, name: impl Into<String>, target: TargetConfiguration) -> Self {
        self.targets.insert(name.into(), target);
        self
    }

    /// Path of this project's `project.json`.
    pub fn config_path(&self) -> String {
        if self.root.is_empty() || self.root == "." {
            "project.json".into()
        } else {
            format!("{}/project.json", self.root)
        }
    }

    /// See [`target_graph::add_dependency_to_target_if_not_present`].
    pub fn add_dependency_to_target_if_not_present(
        &mut self,
        target: &str,
        dependency: &str,
    ) -> EdgeInsertion {
        target_graph::add_dependency_to_target_if_not_present(&mut self.targets, target, dependency)
    }

    /// See [`target_graph::add_target_if_not_present`].
    pub fn add_target_if_not_present(
        &mut self,
        name: &str,
        target: TargetConfiguration,
    ) -> bool {
        target_graph::add_target_if_not_present(&mut self.targets, name, target)
    }
}

fn schema_path(root: &str) -> String {
    format!(
        "{}node_modules/nx/schemas/project-schema.json",
        crate::domain::names::offset_from_root(root)
    )
}

/// One entry of a target's `dependsOn` list.
///
/// Nx accepts both a bare string (`"build"`, `"^build"`, `"proj:build"`)
/// and an object form. Only the string form is created or matched by this
/// crate; object entries are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependsOn {
    Target(String),
    Detailed(Map<String, Value>),
}

impl DependsOn {
    pub fn as_target(&self) -> Option<&str> {
        match self {
            Self::Target(name) => Some(name),
            Self::Detailed(_) => None,
        }
    }
}

impl From<&str> for DependsOn {
    fn from(s: &str) -> Self {
        Self::Target(s.to_string())
    }
}

/// One named target in a project's target map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuous: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<DependsOn>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub configurations: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_configuration: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TargetConfiguration {
    /// A `nx:run-commands` target running `command`.
    pub fn run_commands(command: impl Into<String>) -> Self {
        Self::default()
            .executor(RUN_COMMANDS)
            .option("command", command.into())
    }

    /// A `nx:run-commands` target running several commands in order.
    pub fn run_commands_sequence<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commands: Vec<Value> = commands
            .into_iter()
            .map(|c| Value::String(c.into()))
            .collect();
        Self::default()
            .executor(RUN_COMMANDS)
            .option("commands", commands)
            .option("parallel", false)
    }

    /// An aggregate target with no work of its own.
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn executor(mut self, executor: impl Into<String>) -> Self {
        self.executor = Some(executor.into());
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn cwd(self, cwd: impl Into<String>) -> Self {
        self.option("cwd", cwd.into())
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.outputs.push(output.into());
        self
    }

    pub fn cached(mut self) -> Self {
        self.cache = Some(true);
        self
    }

    pub fn continuous(mut self) -> Self {
        self.continuous = Some(true);
        self
    }

    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.depends_on
            .extend(deps.into_iter().map(|d| DependsOn::from(d.as_ref())));
        self
    }

    pub fn configuration(mut self, name: impl Into<String>, options: Value) -> Self {
        self.configurations.insert(name.into(), options);
        self
    }

    /// The shell command of a `run-commands` target, if it has one.
    pub fn command_line(&self) -> Option<&str> {
        self.options
            .get("command")
            .and_then(Value::as_str)
            .or(self.command.as_deref())
    }

    /// String `dependsOn` entries in declaration order.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.depends_on.iter().filter_map(DependsOn::as_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_unknown_fields() {
        let raw = json!({
            "name": "api",
            "root": "packages/api",
            "implicitDependencies": ["other"],
            "targets": {
                "build": {
                    "executor": "nx:run-commands",
                    "dependsOn": ["compile", { "target": "build", "projects": ["x"] }],
                    "inputs": ["default"]
                }
            }
        });
        let project: ProjectConfiguration = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(project.extra["implicitDependencies"], json!(["other"]));
        assert_eq!(project.targets["build"].extra["inputs"], json!(["default"]));
        assert_eq!(
            project.targets["build"].dependency_names().collect::<Vec<_>>(),
            vec!["compile"]
        );

        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(back["implicitDependencies"], raw["implicitDependencies"]);
        assert_eq!(back["targets"]["build"]["dependsOn"][1]["projects"], json!(["x"]));
    }

    #[test]
    fn run_commands_builder() {
        let target = TargetConfiguration::run_commands("tsc --build")
            .cwd("{projectRoot}")
            .output("{workspaceRoot}/dist/{projectRoot}/tsc")
            .cached();
        assert_eq!(target.executor.as_deref(), Some(RUN_COMMANDS));
        assert_eq!(target.command_line(), Some("tsc --build"));
        assert_eq!(target.options["cwd"], "{projectRoot}");
        assert_eq!(target.cache, Some(true));
    }

    #[test]
    fn new_project_points_schema_at_workspace_root() {
        let project = ProjectConfiguration::new("api", "packages/api");
        assert_eq!(
            project.schema.as_deref(),
            Some("../../node_modules/nx/schemas/project-schema.json")
        );
        assert_eq!(project.config_path(), "packages/api/project.json");
    }
}
