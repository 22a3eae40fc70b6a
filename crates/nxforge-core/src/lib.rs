//! nxforge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for nxforge, a
//! generator suite that scaffolds AWS projects (APIs, websites, Lambda
//! functions, MCP servers, CDK and Terraform infrastructure) inside an
//! Nx-style monorepo.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           nxforge-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GeneratorService, CatalogService)     │
//! │   Generators edit a virtual Tree        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │            (Filesystem)                 │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    nxforge-adapters (Infrastructure)    │
//! │  (LocalFilesystem, MemoryFilesystem)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProjectConfiguration, target graph,    │
//! │  versions, names, TypeScript AST)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nxforge_core::prelude::*;
//! # fn run(filesystem: Box<dyn Filesystem>) -> ForgeResult<()> {
//! let service = GeneratorService::new(filesystem);
//! let report = service.run(&FastApiGenerator::new(FastApiOptions::new("orders-api")), false)?;
//! for change in &report.changes {
//!     println!("{} {}", change.kind, change.path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::generators::*;
    pub use crate::application::{
        CatalogService, ChangeKind, FileChange, GenerationReport, GeneratorService,
        GeneratorSummary, Tree,
        ports::Filesystem,
    };
    pub use crate::domain::{
        Auth, ComputeType, EventSource, GeneratorInfo, IacProvider, IacProviderOption,
        McpComputeType, ProjectType, PythonPlatform,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

