//! `.gitignore` patching.

use tracing::debug;

use crate::application::tree::{Tree, join_path};
use crate::error::ForgeResult;

/// Append each entry not already present as a line of `<dir>/.gitignore`.
///
/// Existing lines are never rewritten or reordered. The file is created
/// when missing.
pub fn add_gitignore_entries(tree: &mut Tree<'_>, dir: &str, entries: &[&str]) -> ForgeResult<()> {
    let path = join_path(dir, ".gitignore");
    let mut content = tree.read(&path)?.unwrap_or_default();

    let missing: Vec<&str> = {
        let existing: Vec<&str> = content.lines().map(str::trim).collect();
        let mut missing = Vec::new();
        for entry in entries {
            if !existing.contains(entry) && !missing.contains(entry) {
                missing.push(*entry);
            }
        }
        missing
    };
    if missing.is_empty() {
        return Ok(());
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    for entry in &missing {
        content.push_str(entry);
        content.push('\n');
    }
    debug!(path = %path, added = missing.len(), "Updated .gitignore");
    tree.write(&path, content);
    Ok(())
}
