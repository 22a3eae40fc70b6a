//! Tree mutation helpers shared by every generator.
//!
//! Each helper reads what it needs from the [`Tree`](crate::application::Tree),
//! changes it in place and writes it back. None of them touch disk.

pub mod ast;
pub mod bundle;
pub mod docker;
pub mod files;
pub mod format;
pub mod git;
pub mod json;
pub mod npm_scope;
pub mod object;
pub mod package_json;
pub mod plugin_config;
pub mod ports;
pub mod projects;
pub mod toml;
pub mod tsconfig;

pub use ast::{add_star_export, append_call_array_entry};
pub use bundle::{
    BUNDLE_TARGET, PythonBundleOptions, TypeScriptBundleOptions, add_python_bundle_target,
    add_typescript_bundle_target,
};
pub use docker::{DOCKER_TARGET, DockerTargetOptions, add_docker_target};
pub use files::{OverwriteStrategy, generate_files};
pub use format::{ensure_trailing_newlines, format_json_files};
pub use git::add_gitignore_entries;
pub use json::{read_json, read_json_if_exists, update_json, write_json};
pub use npm_scope::get_npm_scope;
pub use package_json::add_dependencies_to_package_json;
pub use plugin_config::{
    PLUGIN_CONFIG_PATH, PluginConfig, ensure_plugin_config, read_plugin_config,
    resolve_iac_provider, update_plugin_config,
};
pub use ports::{assign_port, next_available_port};
pub use projects::{
    add_project_configuration, ensure_dependency, get_projects, read_project_configuration,
    read_project_configuration_unqualified, update_project, update_project_configuration,
};
pub use self::toml::{
    add_dependencies_to_pyproject_toml, add_dev_dependencies_to_pyproject_toml,
    add_uv_workspace_member, read_toml_document, write_toml_document,
};
pub use tsconfig::add_tsconfig_path;
