//! Span-based source rewriting.

use crate::domain::ast::query::{Node, SourceFile};
use crate::domain::ast::{AstError, Span};

/// Replace `span` of the source with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

impl Edit {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(Span::empty(at), text)
    }
}

/// Apply non-overlapping edits. Insertions at the same offset keep their
/// given order.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<String, AstError> {
    edits.sort_by_key(|edit| (edit.span.start, edit.span.end));

    for pair in edits.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if second.span.start < first.span.end {
            return Err(AstError::OverlappingEdits {
                first: first.span,
                second: second.span,
            });
        }
    }

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in &edits {
        out.push_str(&source[cursor..edit.span.start]);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

/// Rewrite `source` by running `producer` on every node `predicate`
/// selects and applying the edits it returns.
///
/// Nodes are visited in source order. A source with no selected nodes is
/// returned unchanged.
pub fn transform<P, F>(source: &str, predicate: P, mut producer: F) -> Result<String, AstError>
where
    P: Fn(&Node) -> bool,
    F: FnMut(&Node) -> Vec<Edit>,
{
    let file = SourceFile::parse(source)?;
    let edits: Vec<Edit> = file
        .nodes()
        .iter()
        .filter(|node| predicate(node))
        .flat_map(|node| producer(node))
        .collect();
    apply_edits(source, edits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_in_offset_order() {
        let out = apply_edits(
            "abcdef",
            vec![
                Edit::replace(Span::new(4, 6), "EF"),
                Edit::insert(0, ">"),
                Edit::replace(Span::new(1, 2), "B"),
            ],
        )
        .unwrap();
        assert_eq!(out, ">aBcdEF");
    }

    #[test]
    fn rejects_overlaps() {
        let err = apply_edits(
            "abcdef",
            vec![
                Edit::replace(Span::new(0, 3), "x"),
                Edit::replace(Span::new(2, 4), "y"),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, AstError::OverlappingEdits { .. }));
    }

    #[test]
    fn transform_rewrites_selected_nodes() {
        let source = "import a from './a';\nimport b from 'b';\n";
        let out = transform(
            source,
            |node| matches!(node, Node::Import { specifier, .. } if specifier.starts_with("./")),
            |node| vec![Edit::replace(node.span(), "import a from './a.js';")],
        )
        .unwrap();
        assert_eq!(out, "import a from './a.js';\nimport b from 'b';\n");
    }
}
