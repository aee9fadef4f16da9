use crate::error::{AnalyzeError, Result};
use std::ops::Range;
use std::path::Path;
use tree_sitter::{Parser, TreeCursor};

/// Owned view of one concrete-syntax-tree node. Children include anonymous
/// tokens (keywords, punctuation) so modifiers stay visible.
///
/// Building and dropping never recurse: long expression chains nest
/// arbitrarily deep.
#[derive(Debug)]
pub struct SourceNode {
    kind: &'static str,
    field: Option<&'static str>,
    named: bool,
    byte_range: Range<usize>,
    children: Vec<SourceNode>,
}

impl SourceNode {
    pub fn new(kind: &'static str, byte_range: Range<usize>) -> Self {
        Self {
            kind,
            field: None,
            named: true,
            byte_range,
            children: Vec::new(),
        }
    }

    /// Anonymous token node, e.g. the `public` keyword.
    pub fn token(kind: &'static str, byte_range: Range<usize>) -> Self {
        let mut node = Self::new(kind, byte_range);
        node.named = false;
        node
    }

    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn field(&self) -> Option<&'static str> {
        self.field
    }

    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.byte_range.clone()
    }

    pub fn children(&self) -> &[SourceNode] {
        &self.children
    }

    pub fn named_children(&self) -> impl Iterator<Item = &SourceNode> {
        self.children.iter().filter(|child| child.named)
    }
}

impl Drop for SourceNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Java parser wrapper; one instance is reused for every file of a run.
pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|err| AnalyzeError::Setup(err.to_string()))?;
        Ok(Self { parser })
    }

    /// Parses `source` into a `SourceNode` tree rooted at `program`. Trees
    /// containing syntax errors are rejected instead of half-extracted.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<SourceNode> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| AnalyzeError::Parse {
                path: path.to_path_buf(),
            })?;
        if tree.root_node().has_error() {
            return Err(AnalyzeError::Parse {
                path: path.to_path_buf(),
            });
        }
        let mut cursor = tree.walk();
        convert(&mut cursor).ok_or_else(|| AnalyzeError::Parse {
            path: path.to_path_buf(),
        })
    }
}

fn open(cursor: &TreeCursor<'_>) -> SourceNode {
    let node = cursor.node();
    SourceNode {
        kind: node.kind(),
        field: cursor.field_name(),
        named: node.is_named(),
        byte_range: node.byte_range(),
        children: Vec::with_capacity(node.child_count()),
    }
}

/// Depth-first conversion driven by the cursor. `stack` holds the open
/// ancestors of the cursor's node; a node is attached to its parent once
/// its last child is done.
fn convert(cursor: &mut TreeCursor<'_>) -> Option<SourceNode> {
    let mut stack = vec![open(cursor)];
    let mut descend = true;
    while let Some(current) = stack.pop() {
        if descend && cursor.goto_first_child() {
            stack.push(current);
            stack.push(open(cursor));
            continue;
        }
        let Some(parent) = stack.last_mut() else {
            return Some(current);
        };
        parent.children.push(current);
        if cursor.goto_next_sibling() {
            stack.push(open(cursor));
            descend = true;
        } else {
            cursor.goto_parent();
            descend = false;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_into_program_root() {
        let mut parser = JavaParser::new().unwrap();
        let source = "class Foo {}";
        let root = parser.parse(source, Path::new("Foo.java")).unwrap();
        assert_eq!(root.kind(), "program");
        assert_eq!(root.byte_range(), 0..source.len());
        let class = &root.children()[0];
        assert_eq!(class.kind(), "class_declaration");
        let name = class
            .children()
            .iter()
            .find(|child| child.field() == Some("name"))
            .unwrap();
        assert_eq!(&source[name.byte_range()], "Foo");
    }

    #[test]
    fn keeps_anonymous_keyword_tokens() {
        let mut parser = JavaParser::new().unwrap();
        let root = parser
            .parse("public class Foo {}", Path::new("Foo.java"))
            .unwrap();
        let modifiers = &root.children()[0].children()[0];
        assert_eq!(modifiers.kind(), "modifiers");
        let keyword = &modifiers.children()[0];
        assert_eq!(keyword.kind(), "public");
        assert!(!keyword.is_named());
    }

    #[test]
    fn siblings_and_nesting_survive_conversion() {
        let mut parser = JavaParser::new().unwrap();
        let source = "class A { int x; void f() { g(); } }\nclass B {}";
        let root = parser.parse(source, Path::new("A.java")).unwrap();
        let kinds: Vec<_> = root.children().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec!["class_declaration", "class_declaration"]);
        let body = &root.children()[0].children()[2];
        assert_eq!(body.kind(), "class_body");
        let members: Vec<_> = body.named_children().map(|c| c.kind()).collect();
        assert_eq!(members, vec!["field_declaration", "method_declaration"]);
        assert_eq!(&source[root.children()[1].byte_range()], "class B {}");
    }

    #[test]
    fn deeply_nested_expression_does_not_overflow() {
        let terms = vec!["1"; 100_000].join(" + ");
        let source = format!("class D {{ int f() {{ return {terms}; }} }}");
        let mut parser = JavaParser::new().unwrap();
        let root = parser.parse(&source, Path::new("D.java")).unwrap();
        assert_eq!(root.kind(), "program");
        let chain =
            crate::analyzer::locate::find_all_descendants_of_kind(&root, "binary_expression");
        assert_eq!(chain.len(), 99_999);
        drop(root);
    }

    #[test]
    fn truncated_source_is_a_parse_error() {
        let mut parser = JavaParser::new().unwrap();
        let err = parser
            .parse("class Foo { void bar() {", Path::new("src/Foo.java"))
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Parse { .. }));
        assert!(!err.is_fatal());
    }
}
