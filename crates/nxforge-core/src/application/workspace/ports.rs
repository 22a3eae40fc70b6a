//! Local development port allocation.

use tracing::{debug, instrument};

use crate::application::tree::Tree;
use crate::application::workspace::projects::{get_projects, update_project};
use crate::domain::ports::next_free_port;
use crate::error::ForgeResult;

/// Pick the lowest port `>= base` that no project in the workspace has
/// recorded, and record it on `project_name`.
#[instrument(skip(tree))]
pub fn assign_port(tree: &mut Tree<'_>, project_name: &str, base: u16) -> ForgeResult<u16> {
    let used: Vec<u16> = get_projects(tree)?
        .values()
        .flat_map(|project| project.recorded_ports())
        .collect();
    let port = next_free_port(used, base)?;
    update_project(tree, project_name, |project| {
        project.record_port(port);
        Ok(())
    })?;
    debug!(port, "Assigned port");
    Ok(port)
}

/// Pick a free port without recording it, for callers that store it as
/// component metadata instead.
pub fn next_available_port(tree: &Tree<'_>, base: u16) -> ForgeResult<u16> {
    let used: Vec<u16> = get_projects(tree)?
        .values()
        .flat_map(|project| project.recorded_ports())
        .collect();
    Ok(next_free_port(used, base)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workspace::projects::add_project_configuration;
    use crate::domain::{ComponentMetadata, ProjectConfiguration, metadata};

    #[test]
    fn assigns_distinct_ports_across_projects() {
        let mut tree = Tree::empty();
        for name in ["a", "b"] {
            add_project_configuration(
                &mut tree,
                &ProjectConfiguration::new(name, format!("packages/{name}")),
            )
            .unwrap();
        }
        let first = assign_port(&mut tree, "a", 8000).unwrap();
        let second = assign_port(&mut tree, "b", 8000).unwrap();
        let third = assign_port(&mut tree, "a", 8000).unwrap();
        assert_eq!((first, second, third), (8000, 8001, 8002));
    }

    #[test]
    fn component_ports_count_as_used() {
        let mut tree = Tree::empty();
        let mut project = ProjectConfiguration::new("mcp", "packages/mcp");
        project.add_component_generator_metadata(
            ComponentMetadata::new(&metadata::TS_MCP_SERVER, "server").with_port(8000),
        );
        add_project_configuration(&mut tree, &project).unwrap();
        assert_eq!(next_available_port(&tree, 8000).unwrap(), 8001);
    }
}
