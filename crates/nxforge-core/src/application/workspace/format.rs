//! Normalization of the files a generator wrote.

use serde_json::Value;
use tracing::{debug, warn};

use crate::application::tree::Tree;
use crate::application::workspace::json::to_json_string;
use crate::error::ForgeResult;

/// Re-print every JSON file written below `dir` with 2-space indentation.
///
/// Files that do not parse are left untouched and logged.
pub fn format_json_files(tree: &mut Tree<'_>, dir: &str) -> ForgeResult<()> {
    let prefix = crate::application::tree::normalize_path(dir);
    let paths: Vec<String> = tree
        .touched()
        .filter(|p| p.ends_with(".json"))
        .filter(|p| prefix.is_empty() || p.starts_with(&format!("{prefix}/")))
        .map(str::to_string)
        .collect();

    for path in paths {
        let Some(content) = tree.read(&path)? else {
            continue;
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(value) => {
                let formatted = to_json_string(&path, &value)?;
                if formatted != content {
                    debug!(path = %path, "Reformatted JSON");
                    tree.write(&path, formatted);
                }
            }
            Err(e) => warn!(path = %path, error = %e, "Skipping JSON file that does not parse"),
        }
    }
    Ok(())
}

/// Give every written text file a single trailing newline.
pub fn ensure_trailing_newlines(tree: &mut Tree<'_>) -> ForgeResult<()> {
    let paths: Vec<String> = tree.touched().map(str::to_string).collect();
    for path in paths {
        let Some(content) = tree.read(&path)? else {
            continue;
        };
        if content.is_empty() {
            continue;
        }
        let trimmed = content.trim_end_matches('\n');
        if trimmed.len() + 1 != content.len() {
            tree.write(&path, format!("{trimmed}\n"));
        }
    }
    Ok(())
}
