//! Core domain layer for nxforge.
//!
//! Pure logic over in-memory values. Nothing in here touches the
//! filesystem or logs: the application layer reads files into these types,
//! calls the operations below, and writes the results back.
//!
//! - [`project`] / [`target_graph`]: the `project.json` model and the
//!   idempotent target-graph edits every generator relies on
//! - [`metadata`] / [`ports`]: generator provenance and dev-server ports
//! - [`pep508`] / [`versions`]: dependency pinning and merging
//! - [`ast`]: TypeScript source edits
//! - [`names`] / [`render`]: naming conventions and `{{VAR}}` templates
pub mod ast;
pub mod error;
pub mod metadata;
pub mod names;
pub mod pep508;
pub mod ports;
pub mod project;
pub mod render;
pub mod target_graph;
pub mod value_objects;
pub mod versions;

pub use error::{DomainError, ErrorCategory};
pub use metadata::{ComponentMetadata, GENERATOR_REGISTRY, GeneratorInfo, find_generator};
pub use project::{DependsOn, ProjectConfiguration, RUN_COMMANDS, TargetConfiguration};
pub use render::RenderContext;
pub use target_graph::{EdgeInsertion, TargetRef};
pub use value_objects::{
    ApiBackend, Auth, ComputeType, EventSource, IacProvider, IacProviderOption, McpComputeType,
    ProjectType, PythonPlatform,
};
