//! Grammar-agnostic searches over a `SourceNode` tree.

use crate::analyzer::tree::SourceNode;
use crate::util;

/// First direct child with the given kind. Does not recurse.
pub fn find_first_child_of_kind<'a>(node: &'a SourceNode, kind: &str) -> Option<&'a SourceNode> {
    node.children().iter().find(|child| child.kind() == kind)
}

/// First direct child whose kind is any of `kinds`.
pub fn find_first_child_of_kinds<'a>(
    node: &'a SourceNode,
    kinds: &[&str],
) -> Option<&'a SourceNode> {
    node.children()
        .iter()
        .find(|child| kinds.contains(&child.kind()))
}

/// Every node of the given kind in the subtree, `node` included, in
/// depth-first pre-order.
pub fn find_all_descendants_of_kind<'a>(node: &'a SourceNode, kind: &str) -> Vec<&'a SourceNode> {
    walk_preorder(node)
        .filter(|candidate| candidate.kind() == kind)
        .collect()
}

/// First direct child attached under the grammar field `field`.
pub fn child_by_field<'a>(node: &'a SourceNode, field: &str) -> Option<&'a SourceNode> {
    node.children()
        .iter()
        .find(|child| child.field() == Some(field))
}

pub fn node_text<'s>(node: &SourceNode, source: &'s str) -> &'s str {
    let range = node.byte_range();
    util::slice_bytes(source, range.start, range.end).unwrap_or("")
}

pub fn walk_preorder(node: &SourceNode) -> Preorder<'_> {
    Preorder { stack: vec![node] }
}

pub struct Preorder<'a> {
    stack: Vec<&'a SourceNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a SourceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // class Foo { void a() { class Inner { void b() {} } } }
    fn sample() -> SourceNode {
        let inner_method = SourceNode::new("method_declaration", 30..40);
        let inner_class = SourceNode::new("class_declaration", 20..42)
            .with_child(SourceNode::new("class_body", 25..42).with_child(inner_method));
        let outer_method = SourceNode::new("method_declaration", 12..44)
            .with_child(SourceNode::new("identifier", 17..18).with_field("name"))
            .with_child(SourceNode::new("block", 19..44).with_child(inner_class));
        SourceNode::new("class_declaration", 0..46)
            .with_child(SourceNode::token("class", 0..5))
            .with_child(SourceNode::new("identifier", 6..9).with_field("name"))
            .with_child(SourceNode::new("class_body", 10..46).with_child(outer_method))
    }

    #[test]
    fn first_child_does_not_recurse() {
        let root = sample();
        let ident = find_first_child_of_kind(&root, "identifier").unwrap();
        assert_eq!(ident.byte_range(), 6..9);
        assert!(find_first_child_of_kind(&root, "method_declaration").is_none());
    }

    #[test]
    fn descendants_include_nested_and_self() {
        let root = sample();
        let methods = find_all_descendants_of_kind(&root, "method_declaration");
        let ranges: Vec<_> = methods.iter().map(|m| m.byte_range()).collect();
        assert_eq!(ranges, vec![12..44, 30..40]);

        let classes = find_all_descendants_of_kind(&root, "class_declaration");
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].byte_range(), 0..46);
    }

    #[test]
    fn preorder_visits_parents_before_children() {
        let root = sample();
        let kinds: Vec<_> = walk_preorder(&root).map(|n| n.kind()).take(4).collect();
        assert_eq!(
            kinds,
            vec!["class_declaration", "class", "identifier", "class_body"]
        );
    }

    #[test]
    fn field_lookup_and_text() {
        let source = "class Foo {}";
        let root = SourceNode::new("class_declaration", 0..12)
            .with_child(SourceNode::new("identifier", 6..9).with_field("name"));
        let name = child_by_field(&root, "name").unwrap();
        assert_eq!(node_text(name, source), "Foo");
        assert!(child_by_field(&root, "body").is_none());
    }

    #[test]
    fn kinds_lookup_takes_first_match() {
        let root = sample();
        let hit = find_first_child_of_kinds(&root, &["class_body", "identifier"]).unwrap();
        assert_eq!(hit.kind(), "identifier");
    }
}
