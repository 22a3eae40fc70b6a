//! PEP 508 requirement names and dependency-list merging.

use once_cell::sync::Lazy;
use regex::Regex;

static REQUIREMENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[[^\]]*\])?\s*(?:[<>=!~;@(]|$)")
        .expect("valid regex")
});

static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_.]+").expect("valid regex"));

/// The distribution name of a requirement string.
///
/// `fastapi[standard]==0.121.0` → `fastapi`, `pkg @ git+https://...` →
/// `pkg`. Bare URLs, editable installs and anything else without a leading
/// name yield `None`.
pub fn requirement_name(requirement: &str) -> Option<&str> {
    REQUIREMENT_NAME
        .captures(requirement)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Normalized name for comparison: lowercase, runs of `-_.` become `-`.
pub fn normalize_name(name: &str) -> String {
    SEPARATOR_RUN
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}

/// True when both requirements name the same distribution.
pub fn same_distribution(a: &str, b: &str) -> bool {
    match (requirement_name(a), requirement_name(b)) {
        (Some(a), Some(b)) => normalize_name(a) == normalize_name(b),
        _ => false,
    }
}

/// Index of the entry in `existing` naming the same distribution as
/// `requirement`.
pub fn find_requirement<S: AsRef<str>>(existing: &[S], requirement: &str) -> Option<usize> {
    existing
        .iter()
        .position(|entry| same_distribution(entry.as_ref(), requirement))
}

/// One step of merging a requirement into an existing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStep<'a> {
    /// Overwrite the entry at this index.
    Replace(usize, &'a str),
    Append(&'a str),
}

/// The steps that merge `additions` into `existing`.
///
/// An addition whose name matches an entry (existing, or appended by an
/// earlier step) replaces that entry at its position; otherwise it is
/// appended. Entries that match no addition, including ones with no
/// parsable name, are left alone.
pub fn plan_merge<'a, E: AsRef<str>, A: AsRef<str>>(
    existing: &[E],
    additions: &'a [A],
) -> Vec<MergeStep<'a>> {
    let mut current: Vec<&str> = existing.iter().map(AsRef::as_ref).collect();
    let mut steps = Vec::with_capacity(additions.len());

    for addition in additions {
        let addition = addition.as_ref();
        match find_requirement(&current, addition) {
            Some(index) => {
                current[index] = addition;
                steps.push(MergeStep::Replace(index, addition));
            }
            None => {
                current.push(addition);
                steps.push(MergeStep::Append(addition));
            }
        }
    }

    steps
}
