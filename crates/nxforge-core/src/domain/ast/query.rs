//! Structural view of a TypeScript module.
//!
//! The module is parsed with tree-sitter and reduced to the shapes the
//! generators edit: top-level imports, star re-exports, the empty
//! `export {};` placeholder, and calls whose first argument is an array
//! literal (`defineConfig([...])`).

use tree_sitter::{Node as SyntaxNode, Parser};

use crate::domain::ast::transform::Edit;
use crate::domain::ast::{AstError, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Import { specifier: String, span: Span },
    ExportStar { specifier: String, span: Span },
    ExportEmpty { span: Span },
    CallArray(CallArray),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Self::Import { span, .. } | Self::ExportStar { span, .. } | Self::ExportEmpty { span } => {
                *span
            }
            Self::CallArray(call) => call.span,
        }
    }
}

/// `callee([ ... ])`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArray {
    pub callee: String,
    pub span: Span,
    pub array: ArrayLiteral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLiteral {
    /// Brackets included.
    pub span: Span,
    pub elements: Vec<ArrayElement>,
    pub trailing_comma: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayElement {
    pub span: Span,
    pub object: Option<ObjectLiteral>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLiteral {
    pub span: Span,
    pub properties: Vec<Property>,
}

/// A top-level object property. `value` is set only when the value is a
/// single string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: Option<String>,
    pub span: Span,
}

impl ObjectLiteral {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .and_then(|p| p.value.as_deref())
    }
}

impl ArrayLiteral {
    pub fn has_object_with(&self, key: &str, value: &str) -> bool {
        self.elements
            .iter()
            .filter_map(|e| e.object.as_ref())
            .any(|o| o.get(key) == Some(value))
    }

    /// Edit that appends `entry` as the last element, one element per line.
    pub fn append_edit(&self, source: &str, entry: &str) -> Edit {
        let inner = Span::new(self.span.start + 1, self.span.end - 1);
        match (self.elements.last(), self.trailing_comma) {
            (None, _) if source[inner.start..inner.end].trim().is_empty() => {
                Edit::replace(inner, format!("\n  {entry},\n"))
            }
            (None, _) => Edit::insert(inner.start, format!("\n  {entry},")),
            (Some(_), Some(comma)) => Edit::insert(comma.end, format!("\n  {entry},")),
            (Some(last), None) => Edit::insert(last.span.end, format!(",\n  {entry}")),
        }
    }
}

/// Parsed module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    nodes: Vec<Node>,
}

impl SourceFile {
    /// Parse `source`. Any syntax error in the module is rejected.
    pub fn parse(source: &str) -> Result<Self, AstError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|e| AstError::Grammar(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AstError::Grammar("parser produced no tree".into()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(AstError::Syntax {
                offset: first_error(root).unwrap_or(root.start_byte()),
            });
        }

        Ok(Self {
            nodes: collect(source, root),
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Import { specifier, .. } => Some(specifier.as_str()),
            _ => None,
        })
    }

    pub fn star_exports(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match n {
            Node::ExportStar { specifier, .. } => Some(specifier.as_str()),
            _ => None,
        })
    }

    pub fn call_array(&self, callee: &str) -> Option<&CallArray> {
        self.nodes.iter().find_map(|n| match n {
            Node::CallArray(call) if call.callee == callee => Some(call),
            _ => None,
        })
    }
}

fn span_of(node: SyntaxNode<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn text<'s>(source: &'s str, node: SyntaxNode<'_>) -> &'s str {
    &source[node.byte_range()]
}

/// Byte offset of the first error or missing node, in source order.
fn first_error(root: SyntaxNode<'_>) -> Option<usize> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_byte());
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Pre-order walk. Imports and exports are only taken from the program's
/// direct children; array calls are found at any depth.
fn collect(source: &str, root: SyntaxNode<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let top_level = node.parent().is_some_and(|p| p.id() == root.id());
        match node.kind() {
            "import_statement" if top_level => nodes.extend(import(source, node)),
            "export_statement" if top_level => nodes.extend(export(source, node)),
            "call_expression" => nodes.extend(call_array(source, node).map(Node::CallArray)),
            _ => {}
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    nodes
}

fn source_specifier(source: &str, statement: SyntaxNode<'_>) -> Option<String> {
    statement
        .child_by_field_name("source")
        .filter(|s| s.kind() == "string")
        .map(|s| string_value(text(source, s)))
}

fn import(source: &str, statement: SyntaxNode<'_>) -> Option<Node> {
    Some(Node::Import {
        specifier: source_specifier(source, statement)?,
        span: span_of(statement),
    })
}

fn export(source: &str, statement: SyntaxNode<'_>) -> Option<Node> {
    let mut cursor = statement.walk();
    let children: Vec<_> = statement.children(&mut cursor).collect();

    let is_star = children
        .iter()
        .any(|c| c.kind() == "*" || c.kind() == "namespace_export");
    if is_star {
        return Some(Node::ExportStar {
            specifier: source_specifier(source, statement)?,
            span: span_of(statement),
        });
    }

    let clause = children.iter().find(|c| c.kind() == "export_clause")?;
    let mut clause_cursor = clause.walk();
    let empty = clause.named_children(&mut clause_cursor).all(|c| c.is_extra());
    if empty && statement.child_by_field_name("source").is_none() {
        return Some(Node::ExportEmpty {
            span: span_of(statement),
        });
    }
    None
}

fn call_array(source: &str, call: SyntaxNode<'_>) -> Option<CallArray> {
    let callee = call
        .child_by_field_name("function")
        .filter(|f| f.kind() == "identifier")?;
    let arguments = call.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let array = arguments
        .named_children(&mut cursor)
        .find(|c| !c.is_extra())
        .filter(|c| c.kind() == "array")?;

    Some(CallArray {
        callee: text(source, callee).to_string(),
        span: span_of(call),
        array: array_literal(source, array),
    })
}

fn array_literal(source: &str, array: SyntaxNode<'_>) -> ArrayLiteral {
    let mut elements = Vec::new();
    let mut trailing_comma = None;
    let mut cursor = array.walk();

    for child in array.children(&mut cursor) {
        if child.is_extra() {
            continue;
        }
        if child.kind() == "," {
            trailing_comma = Some(span_of(child));
        } else if child.is_named() {
            elements.push(ArrayElement {
                span: span_of(child),
                object: (child.kind() == "object").then(|| object_literal(source, child)),
            });
            trailing_comma = None;
        }
    }

    ArrayLiteral {
        span: span_of(array),
        elements,
        trailing_comma,
    }
}

fn object_literal(source: &str, object: SyntaxNode<'_>) -> ObjectLiteral {
    let mut cursor = object.walk();
    let properties = object
        .named_children(&mut cursor)
        .filter_map(|member| property(source, member))
        .collect();
    ObjectLiteral {
        span: span_of(object),
        properties,
    }
}

fn property(source: &str, member: SyntaxNode<'_>) -> Option<Property> {
    match member.kind() {
        "shorthand_property_identifier" => Some(Property {
            key: text(source, member).to_string(),
            value: None,
            span: span_of(member),
        }),
        "pair" => {
            let key = member.child_by_field_name("key")?;
            let key = match key.kind() {
                "property_identifier" | "number" => text(source, key).to_string(),
                "string" => string_value(text(source, key)),
                _ => return None,
            };
            let value = member
                .child_by_field_name("value")
                .filter(|v| v.kind() == "string")
                .map(|v| string_value(text(source, v)));
            Some(Property {
                key,
                value,
                span: span_of(member),
            })
        }
        _ => None,
    }
}

/// Contents of a quoted string literal with escapes resolved.
fn string_value(raw: &str) -> String {
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_imports_and_exports() {
        let source = r#"
import { defineConfig } from 'rolldown';
import './side-effect.js';
import type { Foo } from "./types";
export * from './app.js';
export * as core from './core/index.js';
export { a } from './a.js';
const lazy = import('./lazy.js');
"#;
        let file = SourceFile::parse(source).unwrap();
        assert_eq!(
            file.imports().collect::<Vec<_>>(),
            vec!["rolldown", "./side-effect.js", "./types"]
        );
        assert_eq!(
            file.star_exports().collect::<Vec<_>>(),
            vec!["./app.js", "./core/index.js"]
        );
    }

    #[test]
    fn export_placeholder_span_covers_semicolon() {
        let source = "export {};\n";
        let file = SourceFile::parse(source).unwrap();
        assert_eq!(file.nodes(), &[Node::ExportEmpty { span: Span::new(0, 10) }]);
    }

    #[test]
    fn reads_call_array_objects() {
        let source = r#"export default defineConfig([
  {
    input: 'src/a.ts',
    output: { file: '../dist/a.js', format: 'cjs' },
    external: [/@aws-sdk\/.*/],
  },
  { 'input': "src/b.ts" },
  other,
]);"#;
        let file = SourceFile::parse(source).unwrap();
        let call = file.call_array("defineConfig").unwrap();
        assert_eq!(call.array.elements.len(), 3);
        assert!(call.array.trailing_comma.is_some());
        assert!(call.array.has_object_with("input", "src/a.ts"));
        assert!(call.array.has_object_with("input", "src/b.ts"));
        let first = call.array.elements[0].object.as_ref().unwrap();
        assert_eq!(first.get("output"), None);
        assert_eq!(first.properties.len(), 3);
        assert!(call.array.elements[2].object.is_none());
    }

    #[test]
    fn malformed_source_is_rejected() {
        assert!(matches!(
            SourceFile::parse("defineConfig([{ input: 'a' ]);"),
            Err(AstError::Syntax { .. })
        ));
        assert!(matches!(
            SourceFile::parse("function f() {"),
            Err(AstError::Syntax { .. })
        ));
    }

    #[test]
    fn regex_literals_do_not_open_strings() {
        let source = "if (x) /'/.test(y);\nexport * from './a.js';\n";
        let file = SourceFile::parse(source).unwrap();
        assert_eq!(file.star_exports().collect::<Vec<_>>(), vec!["./a.js"]);
    }

    #[test]
    fn nested_imports_are_not_module_imports() {
        let source = "declare module 'x' {\n  import './inner.js';\n}\nfunction f() { return import.meta.url; }\n";
        let file = SourceFile::parse(source).unwrap();
        assert_eq!(file.imports().count(), 0);
    }

    #[test]
    fn escaped_and_unicode_strings_are_unquoted() {
        let source = "f([{ input: 'caf\u{e9}/it\\'s.ts' }]);";
        let file = SourceFile::parse(source).unwrap();
        assert!(file.call_array("f").unwrap().array.has_object_with("input", "caf\u{e9}/it's.ts"));
    }

    #[test]
    fn member_calls_are_not_array_calls() {
        let file = SourceFile::parse("config.defineConfig([{ input: 'a' }]);").unwrap();
        assert!(file.call_array("defineConfig").is_none());
    }

    #[test]
    fn append_edit_respects_trailing_comma() {
        let source = "f([\n  { input: 'a' },\n]);";
        let file = SourceFile::parse(source).unwrap();
        let edit = file.call_array("f").unwrap().array.append_edit(source, "{ input: 'b' }");
        let out = crate::domain::ast::apply_edits(source, vec![edit]).unwrap();
        assert_eq!(out, "f([\n  { input: 'a' },\n  { input: 'b' },\n]);");

        let source = "f([{ input: 'a' }]);";
        let file = SourceFile::parse(source).unwrap();
        let edit = file.call_array("f").unwrap().array.append_edit(source, "{ input: 'b' }");
        let out = crate::domain::ast::apply_edits(source, vec![edit]).unwrap();
        assert_eq!(out, "f([{ input: 'a' },\n  { input: 'b' }]);");
    }
}
