//! Application services - orchestrate use cases.
//!
//! Services coordinate generators, the virtual tree and ports to
//! accomplish high-level use cases like "run a generator against the
//! workspace" or "list the generator catalogue".

pub mod catalog_service;
pub mod generator_service;

pub use catalog_service::{CatalogService, GeneratorSummary};
pub use generator_service::{GenerationReport, GeneratorService};
