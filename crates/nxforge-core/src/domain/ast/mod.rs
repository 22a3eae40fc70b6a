//! Surgical TypeScript source edits.
//!
//! Generated `.ts` files are edited in place instead of being regenerated,
//! so anything a user wrote around the generated lines survives. The
//! pipeline is a tree-sitter parse reduced by [`query`] to structural nodes
//! with byte spans, then [`transform`] (span edits chosen by a predicate
//! and a producer).

pub mod query;
pub mod transform;

use thiserror::Error;

use crate::domain::error::DomainError;

pub use query::{ArrayElement, ArrayLiteral, CallArray, Node, ObjectLiteral, Property, SourceFile};
pub use transform::{Edit, apply_edits, transform};

/// Byte range `start..end` into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("syntax error at byte {offset}")]
    Syntax { offset: usize },

    #[error("TypeScript grammar unavailable: {0}")]
    Grammar(String),

    #[error("overlapping edits at bytes {first:?} and {second:?}")]
    OverlappingEdits { first: Span, second: Span },
}

impl AstError {
    /// Attach the file path for reporting.
    pub fn in_file(self, path: impl Into<String>) -> DomainError {
        DomainError::MalformedSource {
            path: path.into(),
            reason: self.to_string(),
        }
    }
}

/// Add `export * from '<module>';` unless an identical star export exists.
///
/// A lone `export {};` placeholder is replaced by the new export. Returns
/// `None` when the source already exports the module.
pub fn add_star_export(source: &str, module: &str) -> Result<Option<String>, AstError> {
    let file = SourceFile::parse(source)?;

    if file.nodes().iter().any(
        |node| matches!(node, Node::ExportStar { specifier, .. } if specifier == module),
    ) {
        return Ok(None);
    }

    let statement = format!("export * from '{module}';");

    let placeholder = file.nodes().iter().find_map(|node| match node {
        Node::ExportEmpty { span } => Some(*span),
        _ => None,
    });
    if let Some(span) = placeholder {
        return apply_edits(source, vec![Edit::replace(span, statement)]).map(Some);
    }

    let mut insertion = String::new();
    if !source.is_empty() && !source.ends_with('\n') {
        insertion.push('\n');
    }
    insertion.push_str(&statement);
    insertion.push('\n');
    apply_edits(source, vec![Edit::insert(source.len(), insertion)]).map(Some)
}

/// Append `entry` to the array passed to `callee([...])` unless one of its
/// object elements already has `key` set to the string `value`.
///
/// Returns `None` when such an element exists or when the source has no
/// `callee([...])` call. Callers that need to tell the two apart check
/// [`SourceFile::call_array`] first.
pub fn append_array_entry(
    source: &str,
    callee: &str,
    key: &str,
    value: &str,
    entry: &str,
) -> Result<Option<String>, AstError> {
    let mut already_present = false;
    let mut matched = false;

    let output = transform(
        source,
        |node| matches!(node, Node::CallArray(call) if call.callee == callee),
        |node| {
            let Node::CallArray(call) = node else {
                return Vec::new();
            };
            if matched {
                return Vec::new();
            }
            matched = true;
            if call.array.has_object_with(key, value) {
                already_present = true;
                return Vec::new();
            }
            vec![call.array.append_edit(source, entry)]
        },
    )?;

    Ok(if already_present || !matched {
        None
    } else {
        Some(output)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_export_replaces_placeholder() {
        let out = add_star_export("export {};\n", "./apis/first-api.js")
            .unwrap()
            .unwrap();
        assert_eq!(out, "export * from './apis/first-api.js';\n");
    }

    #[test]
    fn star_export_appends_once() {
        let source = "export * from './app.js';";
        let once = add_star_export(source, "./runtime-config.js").unwrap().unwrap();
        assert_eq!(
            once,
            "export * from './app.js';\nexport * from './runtime-config.js';\n"
        );
        assert_eq!(add_star_export(&once, "./runtime-config.js").unwrap(), None);
        assert_eq!(add_star_export(&once, "./app.js").unwrap(), None);
    }

    #[test]
    fn star_export_ignores_commented_exports() {
        let source = "// export * from './a.js';\n";
        let out = add_star_export(source, "./a.js").unwrap().unwrap();
        assert!(out.ends_with("export * from './a.js';\n"));
        assert!(out.starts_with("// export"));
    }

    #[test]
    fn star_export_after_regex_literal() {
        let source = "if (x) /'/.test(y);\nexport * from './a.js';\n";
        let out = add_star_export(source, "./b.js").unwrap().unwrap();
        assert_eq!(
            out,
            "if (x) /'/.test(y);\nexport * from './a.js';\nexport * from './b.js';\n"
        );
    }

    #[test]
    fn star_export_rejects_broken_source() {
        assert!(matches!(
            add_star_export("export * from './a.js", "./b.js"),
            Err(AstError::Syntax { .. })
        ));
    }

    #[test]
    fn array_entry_is_appended_once() {
        let source = "import { defineConfig } from 'rolldown';\n\nexport default defineConfig([]);\n";
        let entry = "{\n    input: 'src/a.ts',\n  }";
        let once = append_array_entry(source, "defineConfig", "input", "src/a.ts", entry)
            .unwrap()
            .unwrap();
        assert!(once.contains("input: 'src/a.ts'"));
        assert_eq!(
            append_array_entry(&once, "defineConfig", "input", "src/a.ts", entry).unwrap(),
            None
        );

        let twice = append_array_entry(
            &once,
            "defineConfig",
            "input",
            "src/b.ts",
            "{\n    input: 'src/b.ts',\n  }",
        )
        .unwrap()
        .unwrap();
        let file = SourceFile::parse(&twice).unwrap();
        let call = file.call_array("defineConfig").unwrap();
        assert_eq!(call.array.elements.len(), 2);
    }

    #[test]
    fn array_entry_without_call_is_none() {
        assert_eq!(
            append_array_entry("export default {};", "defineConfig", "input", "a", "{}").unwrap(),
            None
        );
    }
}
