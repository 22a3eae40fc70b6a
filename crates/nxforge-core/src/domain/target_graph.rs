//! Idempotent edits to a project's target map.
//!
//! Generators run independently and in any order, so every edge they add
//! to the target graph must be safe to add again. Matching is by exact
//! string: `"build"`, `"^build"` and `"api:build"` are three different
//! edges. When a new edge names the same target as an existing edge under
//! a different spelling it is still added, and the caller is told so.

use std::collections::BTreeMap;

use crate::domain::project::{DependsOn, TargetConfiguration};

/// A parsed `dependsOn` string.
///
/// Nx target names may themselves contain `:` (`load:runtime-config`), so
/// [`TargetRef::Qualified`] is a best-effort reading used only to spot
/// differently spelled edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef<'a> {
    /// `build`: a target of the same project.
    Local(&'a str),
    /// `^build`: the target of every upstream dependency.
    Upstream(&'a str),
    /// `api:build`: a target of a named project.
    Qualified { project: &'a str, target: &'a str },
}

impl<'a> TargetRef<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if let Some(target) = raw.strip_prefix('^') {
            return Self::Upstream(target);
        }
        match raw.split_once(':') {
            Some((project, target)) if !project.is_empty() && !target.is_empty() => {
                Self::Qualified { project, target }
            }
            _ => Self::Local(raw),
        }
    }

    pub fn target_name(&self) -> &'a str {
        match self {
            Self::Local(t) | Self::Upstream(t) => t,
            Self::Qualified { target, .. } => target,
        }
    }
}

/// Outcome of [`add_dependency_to_target_if_not_present`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeInsertion {
    Added,
    AlreadyPresent,
    /// Added, but `existing` already refers to the same target name under
    /// another spelling.
    AddedAlongside { existing: String },
}

impl EdgeInsertion {
    pub fn was_added(&self) -> bool {
        !matches!(self, Self::AlreadyPresent)
    }
}

/// Ensure `dependency` appears exactly once in `targets[target].dependsOn`.
///
/// The target is created (with no executor and an empty `dependsOn`) when
/// absent. Calling this any number of times is equivalent to calling it
/// once.
pub fn add_dependency_to_target_if_not_present(
    targets: &mut BTreeMap<String, TargetConfiguration>,
    target: &str,
    dependency: &str,
) -> EdgeInsertion {
    let entry = targets.entry(target.to_string()).or_default();

    if entry.dependency_names().any(|d| d == dependency) {
        return EdgeInsertion::AlreadyPresent;
    }

    let wanted = TargetRef::parse(dependency);
    let alias = entry
        .dependency_names()
        .find(|existing| TargetRef::parse(existing).target_name() == wanted.target_name())
        .map(str::to_string);

    entry.depends_on.push(DependsOn::from(dependency));

    match alias {
        Some(existing) => EdgeInsertion::AddedAlongside { existing },
        None => EdgeInsertion::Added,
    }
}

/// Insert `config` under `name` unless a target of that name exists.
///
/// Returns `true` when the target was inserted. An existing target is left
/// exactly as it was, including any hand edits.
pub fn add_target_if_not_present(
    targets: &mut BTreeMap<String, TargetConfiguration>,
    name: &str,
    config: TargetConfiguration,
) -> bool {
    if targets.contains_key(name) {
        return false;
    }
    targets.insert(name.to_string(), config);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(targets: &BTreeMap<String, TargetConfiguration>, name: &str) -> Vec<String> {
        targets[name]
            .dependency_names()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn creates_missing_target() {
        let mut targets = BTreeMap::new();
        let outcome = add_dependency_to_target_if_not_present(&mut targets, "build", "bundle");
        assert_eq!(outcome, EdgeInsertion::Added);
        assert_eq!(deps(&targets, "build"), vec!["bundle"]);
        assert!(targets["build"].executor.is_none());
    }

    #[test]
    fn repeated_calls_add_one_edge() {
        let mut targets = BTreeMap::new();
        for _ in 0..5 {
            add_dependency_to_target_if_not_present(&mut targets, "build", "bundle");
        }
        assert_eq!(deps(&targets, "build"), vec!["bundle"]);
        assert_eq!(
            add_dependency_to_target_if_not_present(&mut targets, "build", "bundle"),
            EdgeInsertion::AlreadyPresent
        );
    }

    #[test]
    fn preserves_existing_edges_and_order() {
        let mut targets = BTreeMap::new();
        targets.insert(
            "build".to_string(),
            TargetConfiguration::noop().depends_on(["lint", "compile"]),
        );
        add_dependency_to_target_if_not_present(&mut targets, "build", "bundle");
        assert_eq!(deps(&targets, "build"), vec!["lint", "compile", "bundle"]);
    }

    #[test]
    fn differently_spelled_edges_are_flagged_not_merged() {
        let mut targets = BTreeMap::new();
        add_dependency_to_target_if_not_present(&mut targets, "build", "^build");
        let outcome = add_dependency_to_target_if_not_present(&mut targets, "build", "api:build");
        assert_eq!(
            outcome,
            EdgeInsertion::AddedAlongside {
                existing: "^build".into()
            }
        );
        assert_eq!(deps(&targets, "build"), vec!["^build", "api:build"]);
    }

    #[test]
    fn target_ref_parsing() {
        assert_eq!(TargetRef::parse("build"), TargetRef::Local("build"));
        assert_eq!(TargetRef::parse("^build"), TargetRef::Upstream("build"));
        assert_eq!(
            TargetRef::parse("@acme/api:bundle"),
            TargetRef::Qualified {
                project: "@acme/api",
                target: "bundle"
            }
        );
    }

    #[test]
    fn add_target_keeps_existing_definition() {
        let mut targets = BTreeMap::new();
        assert!(add_target_if_not_present(
            &mut targets,
            "compile",
            TargetConfiguration::run_commands("tsc")
        ));
        assert!(!add_target_if_not_present(
            &mut targets,
            "compile",
            TargetConfiguration::run_commands("other")
        ));
        assert_eq!(targets["compile"].command_line(), Some("tsc"));
    }
}
