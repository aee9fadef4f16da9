use crate::model::ClassEntity;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Class,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Contains,
    Calls,
    Extends,
    Implements,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    /// `None` for nodes created implicitly as an edge endpoint.
    pub kind: Option<NodeKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GraphEdge {
    source: usize,
    target: usize,
    kind: EdgeKind,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterOptions {
    pub inheritance_edges: bool,
}

/// Append-only directed graph keyed by string ids. At most one edge per
/// ordered node pair; re-adding a pair overwrites its kind.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    index: HashMap<String, usize>,
    nodes: Vec<GraphNode>,
    edge_index: HashMap<(usize, usize), usize>,
    edges: Vec<GraphEdge>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str, kind: NodeKind) {
        let slot = self.intern(id);
        self.nodes[slot].kind = Some(kind);
    }

    pub fn add_edge(&mut self, source: &str, target: &str, kind: EdgeKind) {
        let source = self.intern(source);
        let target = self.intern(target);
        match self.edge_index.get(&(source, target)) {
            Some(&slot) => self.edges[slot].kind = kind,
            None => {
                self.edge_index.insert((source, target), self.edges.len());
                self.edges.push(GraphEdge {
                    source,
                    target,
                    kind,
                });
            }
        }
    }

    fn intern(&mut self, id: &str) -> usize {
        if let Some(&slot) = self.index.get(id) {
            return slot;
        }
        let slot = self.nodes.len();
        self.nodes.push(GraphNode {
            id: id.to_string(),
            kind: None,
        });
        self.index.insert(id.to_string(), slot);
        slot
    }

    /// Adds a class node per class, a method node plus `contains` edge per
    /// method, and a `calls` edge per recorded call target.
    pub fn register_classes(&mut self, classes: &[ClassEntity], options: RegisterOptions) {
        for class in classes {
            let class_id = class.display_name();
            self.add_node(class_id, NodeKind::Class);
            for method in &class.methods {
                let method_id = class.method_id(method);
                self.add_node(&method_id, NodeKind::Method);
                self.add_edge(class_id, &method_id, EdgeKind::Contains);
                for call in &method.calls {
                    self.add_edge(&method_id, call, EdgeKind::Calls);
                }
            }
            if options.inheritance_edges {
                if let Some(parent) = class.extends.as_deref() {
                    self.add_edge(class_id, parent, EdgeKind::Extends);
                }
                for iface in &class.implements {
                    self.add_edge(class_id, iface, EdgeKind::Implements);
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node_kind(&self, id: &str) -> Option<NodeKind> {
        self.index.get(id).and_then(|&slot| self.nodes[slot].kind)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn edge_kind(&self, source: &str, target: &str) -> Option<EdgeKind> {
        let source = *self.index.get(source)?;
        let target = *self.index.get(target)?;
        self.edge_index
            .get(&(source, target))
            .map(|&slot| self.edges[slot].kind)
    }

    pub fn has_edge(&self, source: &str, target: &str, kind: EdgeKind) -> bool {
        self.edge_kind(source, target) == Some(kind)
    }

    /// Targets of outgoing edges of the given kind, in insertion order.
    pub fn successors(&self, id: &str, kind: EdgeKind) -> Vec<&str> {
        let Some(&source) = self.index.get(id) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .filter(|edge| edge.source == source && edge.kind == kind)
            .map(|edge| self.nodes[edge.target].id.as_str())
            .collect()
    }

    pub fn to_node_link(&self) -> NodeLinkGraph<'_> {
        NodeLinkGraph {
            directed: true,
            multigraph: false,
            graph: serde_json::Map::new(),
            nodes: self
                .nodes
                .iter()
                .map(|node| NodeLinkNode {
                    id: &node.id,
                    kind: node.kind,
                })
                .collect(),
            links: self
                .edges
                .iter()
                .map(|edge| NodeLinkEdge {
                    source: &self.nodes[edge.source].id,
                    target: &self.nodes[edge.target].id,
                    kind: edge.kind,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NodeLinkGraph<'a> {
    pub directed: bool,
    pub multigraph: bool,
    pub graph: serde_json::Map<String, serde_json::Value>,
    pub nodes: Vec<NodeLinkNode<'a>>,
    pub links: Vec<NodeLinkEdge<'a>>,
}

#[derive(Debug, Serialize)]
pub struct NodeLinkNode<'a> {
    pub id: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
}

#[derive(Debug, Serialize)]
pub struct NodeLinkEdge<'a> {
    pub source: &'a str,
    pub target: &'a str,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_node_is_idempotent() {
        let mut graph = RelationshipGraph::new();
        graph.add_node("Foo", NodeKind::Class);
        graph.add_node("Foo", NodeKind::Class);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node_kind("Foo"), Some(NodeKind::Class));
    }

    #[test]
    fn edges_create_untyped_endpoints() {
        let mut graph = RelationshipGraph::new();
        graph.add_node("Foo.bar", NodeKind::Method);
        graph.add_edge("Foo.bar", "helper", EdgeKind::Calls);
        assert!(graph.contains_node("helper"));
        assert_eq!(graph.node_kind("helper"), None);
        assert!(graph.has_edge("Foo.bar", "helper", EdgeKind::Calls));
    }

    #[test]
    fn repeated_pair_keeps_one_edge() {
        let mut graph = RelationshipGraph::new();
        graph.add_edge("a", "b", EdgeKind::Calls);
        graph.add_edge("a", "b", EdgeKind::Calls);
        graph.add_edge("b", "a", EdgeKind::Calls);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.successors("a", EdgeKind::Calls), vec!["b"]);
    }

    #[test]
    fn node_link_export_shape() {
        let mut graph = RelationshipGraph::new();
        graph.add_node("Foo", NodeKind::Class);
        graph.add_node("Foo.bar", NodeKind::Method);
        graph.add_edge("Foo", "Foo.bar", EdgeKind::Contains);
        graph.add_edge("Foo.bar", "helper", EdgeKind::Calls);
        let value = serde_json::to_value(graph.to_node_link()).unwrap();
        assert_eq!(
            value,
            json!({
                "directed": true,
                "multigraph": false,
                "graph": {},
                "nodes": [
                    {"id": "Foo", "type": "class"},
                    {"id": "Foo.bar", "type": "method"},
                    {"id": "helper"}
                ],
                "links": [
                    {"source": "Foo", "target": "Foo.bar", "type": "contains"},
                    {"source": "Foo.bar", "target": "helper", "type": "calls"}
                ]
            })
        );
    }
}
