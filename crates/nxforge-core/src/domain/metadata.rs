//! Generator provenance recorded in `project.json` metadata.
//!
//! A project created by a generator carries `metadata.generator`; a
//! generator that adds a sub-unit to an existing project (an MCP server, a
//! Lambda function) appends to `metadata.components`. Ports handed out by
//! [`crate::domain::ports`] are read back from both places.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::project::ProjectConfiguration;

/// Static description of one generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorInfo {
    pub id: &'static str,
    pub metric: &'static str,
    pub resolved_factory_path: &'static str,
    pub resolved_schema_path: &'static str,
    pub description: &'static str,
}

macro_rules! generator_info {
    ($id:literal, $metric:literal, $module:ident, $ty:ident, $options:ident, $desc:literal) => {
        GeneratorInfo {
            id: $id,
            metric: $metric,
            resolved_factory_path: concat!(
                "nxforge_core::application::generators::",
                stringify!($module),
                "::",
                stringify!($ty)
            ),
            resolved_schema_path: concat!(
                "nxforge_core::application::generators::",
                stringify!($module),
                "::",
                stringify!($options)
            ),
            description: $desc,
        }
    };
}

pub const TS_PROJECT: GeneratorInfo = generator_info!(
    "ts#project",
    "g1",
    ts_project,
    TsProjectGenerator,
    TsProjectOptions,
    "Generates a TypeScript library project"
);
pub const PY_PROJECT: GeneratorInfo = generator_info!(
    "py#project",
    "g2",
    py_project,
    PyProjectGenerator,
    PyProjectOptions,
    "Generates a Python project managed by uv"
);
pub const PY_FAST_API: GeneratorInfo = generator_info!(
    "py#fast-api",
    "g3",
    py_fast_api,
    FastApiGenerator,
    FastApiOptions,
    "Generates a FastAPI Python API served from AWS Lambda"
);
pub const TS_TRPC_API: GeneratorInfo = generator_info!(
    "ts#trpc-api",
    "g4",
    ts_trpc_api,
    TrpcApiGenerator,
    TrpcApiOptions,
    "Generates a tRPC TypeScript API served from AWS Lambda"
);
pub const TS_LAMBDA_FUNCTION: GeneratorInfo = generator_info!(
    "ts#lambda-function",
    "g5",
    ts_lambda_function,
    TsLambdaFunctionGenerator,
    TsLambdaFunctionOptions,
    "Adds a TypeScript Lambda function to an existing project"
);
pub const PY_LAMBDA_FUNCTION: GeneratorInfo = generator_info!(
    "py#lambda-function",
    "g6",
    py_lambda_function,
    PyLambdaFunctionGenerator,
    PyLambdaFunctionOptions,
    "Adds a Python Lambda function to an existing project"
);
pub const TS_MCP_SERVER: GeneratorInfo = generator_info!(
    "ts#mcp-server",
    "g7",
    ts_mcp_server,
    TsMcpServerGenerator,
    TsMcpServerOptions,
    "Adds a TypeScript MCP server to an existing project"
);
pub const TS_INFRA: GeneratorInfo = generator_info!(
    "ts#infra",
    "g8",
    ts_infra,
    TsInfraGenerator,
    TsInfraOptions,
    "Generates a CDK infrastructure application"
);
pub const TERRAFORM_PROJECT: GeneratorInfo = generator_info!(
    "terraform#project",
    "g9",
    terraform_project,
    TerraformProjectGenerator,
    TerraformProjectOptions,
    "Generates a Terraform project"
);
pub const TS_REACT_WEBSITE: GeneratorInfo = generator_info!(
    "ts#react-website",
    "g10",
    ts_react_website,
    ReactWebsiteGenerator,
    ReactWebsiteOptions,
    "Generates a React website built with Vite"
);

/// Every generator, in catalogue order.
pub static GENERATOR_REGISTRY: &[GeneratorInfo] = &[
    TS_PROJECT,
    PY_PROJECT,
    PY_FAST_API,
    TS_TRPC_API,
    TS_LAMBDA_FUNCTION,
    PY_LAMBDA_FUNCTION,
    TS_MCP_SERVER,
    TS_INFRA,
    TERRAFORM_PROJECT,
    TS_REACT_WEBSITE,
];

pub fn find_generator(id: &str) -> Option<&'static GeneratorInfo> {
    GENERATOR_REGISTRY.iter().find(|info| info.id == id)
}

/// One entry of `metadata.components`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    pub generator: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentMetadata {
    pub fn new(info: &GeneratorInfo, name: impl Into<String>) -> Self {
        Self {
            generator: info.id.to_string(),
            name: name.into(),
            port: None,
            extra: Map::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

const GENERATOR_KEY: &str = "generator";
const COMPONENTS_KEY: &str = "components";
const PORTS_KEY: &str = "ports";

impl ProjectConfiguration {
    /// Record which generator created this project.
    pub fn add_generator_metadata(&mut self, info: &GeneratorInfo) {
        self.metadata
            .insert(GENERATOR_KEY.into(), Value::String(info.id.into()));
    }

    /// The id stored by [`Self::add_generator_metadata`].
    pub fn generator_id(&self) -> Option<&str> {
        self.metadata.get(GENERATOR_KEY).and_then(Value::as_str)
    }

    /// Set an arbitrary metadata key (`apiName`, `apiType`, ...).
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Components recorded on this project. Entries that do not have the
    /// `{generator, name}` shape are skipped.
    pub fn components(&self) -> Vec<ComponentMetadata> {
        self.metadata
            .get(COMPONENTS_KEY)
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Append a component, or update the existing entry with the same
    /// generator and name in place.
    pub fn add_component_generator_metadata(&mut self, component: ComponentMetadata) {
        let value = match serde_json::to_value(&component) {
            Ok(value) => value,
            Err(_) => return,
        };
        let entries = self
            .metadata
            .entry(COMPONENTS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entries.is_array() {
            *entries = Value::Array(Vec::new());
        }
        let Value::Array(entries) = entries else {
            return;
        };

        let same = |entry: &Value| {
            entry.get("generator").and_then(Value::as_str) == Some(component.generator.as_str())
                && entry.get("name").and_then(Value::as_str) == Some(component.name.as_str())
        };
        match entries.iter_mut().find(|entry| same(entry)) {
            Some(existing) => *existing = value,
            None => entries.push(value),
        }
    }

    /// Every port recorded on this project, `metadata.ports` first.
    pub fn recorded_ports(&self) -> Vec<u16> {
        let mut ports: Vec<u16> = self
            .metadata
            .get(PORTS_KEY)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_u64)
            .filter_map(|p| u16::try_from(p).ok())
            .collect();
        ports.extend(self.components().into_iter().filter_map(|c| c.port));
        ports
    }

    /// Append `port` to `metadata.ports` unless already listed there.
    pub fn record_port(&mut self, port: u16) {
        let entry = self
            .metadata
            .entry(PORTS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(ports) = entry {
            if !ports.iter().any(|p| p.as_u64() == Some(u64::from(port))) {
                ports.push(Value::from(port));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_and_metrics_are_unique() {
        let mut ids: Vec<_> = GENERATOR_REGISTRY.iter().map(|g| g.id).collect();
        let mut metrics: Vec<_> = GENERATOR_REGISTRY.iter().map(|g| g.metric).collect();
        ids.sort_unstable();
        ids.dedup();
        metrics.sort_unstable();
        metrics.dedup();
        assert_eq!(ids.len(), GENERATOR_REGISTRY.len());
        assert_eq!(metrics.len(), GENERATOR_REGISTRY.len());
    }

    #[test]
    fn registry_paths_name_generator_types() {
        let info = find_generator("py#fast-api").unwrap();
        assert_eq!(
            info.resolved_factory_path,
            "nxforge_core::application::generators::py_fast_api::FastApiGenerator"
        );
        assert!(info.resolved_schema_path.ends_with("::FastApiOptions"));
        assert!(find_generator("rust#project").is_none());
    }

    #[test]
    fn components_dedupe_by_generator_and_name() {
        let mut project = ProjectConfiguration::new("tools", "packages/tools");
        project.add_component_generator_metadata(ComponentMetadata::new(&TS_MCP_SERVER, "mcp"));
        project.add_component_generator_metadata(
            ComponentMetadata::new(&TS_MCP_SERVER, "mcp").with_port(8001),
        );
        project.add_component_generator_metadata(ComponentMetadata::new(&TS_LAMBDA_FUNCTION, "mcp"));

        let components = project.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].port, Some(8001));
    }

    #[test]
    fn recorded_ports_include_component_ports() {
        let mut project = ProjectConfiguration::new("api", "packages/api");
        project.record_port(8000);
        project.record_port(8000);
        project.add_component_generator_metadata(
            ComponentMetadata::new(&TS_MCP_SERVER, "mcp").with_port(8002),
        );
        assert_eq!(project.recorded_ports(), vec![8000, 8002]);
    }

    #[test]
    fn generator_metadata_serializes_as_id() {
        let mut project = ProjectConfiguration::new("api", "packages/api");
        project.add_generator_metadata(&PY_FAST_API);
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["metadata"]["generator"], "py#fast-api");
        assert_eq!(project.generator_id(), Some("py#fast-api"));
    }
}
