//! TypeScript source edits applied to files in the tree.

use tracing::debug;

use crate::application::tree::Tree;
use crate::domain::ast::{self, SourceFile};
use crate::domain::DomainError;
use crate::error::ForgeResult;

/// Add `export * from '<module>';` to `file`, creating the file when
/// missing. Returns whether the file changed.
pub fn add_star_export(tree: &mut Tree<'_>, file: &str, module: &str) -> ForgeResult<bool> {
    let source = tree.read(file)?.unwrap_or_default();
    match ast::add_star_export(&source, module).map_err(|e| e.in_file(file))? {
        Some(updated) => {
            debug!(file, module, "Added star export");
            tree.write(file, updated);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Append `entry` to the `callee([...])` array in `file` unless an element
/// with `key: '<value>'` is already there. Returns whether the file changed.
///
/// A file without a `callee([...])` call is a shape error.
pub fn append_call_array_entry(
    tree: &mut Tree<'_>,
    file: &str,
    callee: &str,
    key: &str,
    value: &str,
    entry: &str,
) -> ForgeResult<bool> {
    let source = tree.read_required(file)?;
    let parsed = SourceFile::parse(&source).map_err(|e| e.in_file(file))?;
    if parsed.call_array(callee).is_none() {
        return Err(DomainError::UnexpectedShape {
            path: file.to_string(),
            reason: format!("expected a call to {callee}([...])"),
        }
        .into());
    }
    match ast::append_array_entry(&source, callee, key, value, entry).map_err(|e| e.in_file(file))? {
        Some(updated) => {
            tree.write(file, updated);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_exports_accumulate_once() {
        let mut tree = Tree::empty();
        tree.write("src/index.ts", "export {};\n");
        assert!(add_star_export(&mut tree, "src/index.ts", "./a.js").unwrap());
        assert!(add_star_export(&mut tree, "src/index.ts", "./b.js").unwrap());
        assert!(!add_star_export(&mut tree, "src/index.ts", "./a.js").unwrap());
        assert_eq!(
            tree.read("src/index.ts").unwrap().unwrap(),
            "export * from './a.js';\nexport * from './b.js';\n"
        );
    }

    #[test]
    fn malformed_source_names_the_file() {
        let mut tree = Tree::empty();
        tree.write("src/index.ts", "const s = 'unterminated;\n");
        let err = add_star_export(&mut tree, "src/index.ts", "./a.js").unwrap_err();
        assert!(err.to_string().contains("src/index.ts"));
    }

    #[test]
    fn missing_call_is_a_shape_error() {
        let mut tree = Tree::empty();
        tree.write("rolldown.config.ts", "export default {};\n");
        let err = append_call_array_entry(
            &mut tree,
            "rolldown.config.ts",
            "defineConfig",
            "input",
            "a.ts",
            "{ input: 'a.ts' }",
        )
        .unwrap_err();
        assert!(err.to_string().contains("defineConfig"));
    }
}
