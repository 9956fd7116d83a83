//! petgraph-based dependency graph for one pipeline declaration.

use std::collections::HashMap;
use std::fmt;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use super::types::PipelineDeclaration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallNode {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingEdge {
    /// `Tname` of the consuming binding.
    pub label: String,
}

impl fmt::Display for CallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl fmt::Display for BindingEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Calls as nodes, producer → consumer edges for every call-typed binding.
///
/// Cycles and self-loops are kept as emitted; rejecting them is the
/// compiler's job, not the graph's.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    pub graph: DiGraph<CallNode, BindingEdge>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Build a fresh graph for `decl`. All nodes are added before any edge.
    pub fn build(decl: &PipelineDeclaration) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        // Add all nodes. Duplicate ids keep their own node; lookups resolve to the first.
        for call in &decl.calls {
            let idx = graph.add_node(CallNode {
                id: call.id.clone(),
                label: call.id.clone(),
            });
            node_indices.entry(call.id.clone()).or_insert(idx);
        }

        let mut dependency_graph = DependencyGraph {
            graph,
            node_indices,
        };

        // Add all edges
        for call in &decl.calls {
            let consumer = dependency_graph.ensure_node(&call.id);
            for binding in &call.bindings.list {
                let Some(producer_id) = binding.exp.producer() else {
                    continue;
                };
                let producer = dependency_graph.ensure_node(producer_id);
                dependency_graph.graph.add_edge(
                    producer,
                    consumer,
                    BindingEdge {
                        label: binding.tname.clone(),
                    },
                );
            }
        }

        dependency_graph
    }

    /// Producers outside the declaration (e.g. a call the compiler resolved
    /// elsewhere) still need a node for the edge to attach to.
    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(CallNode {
            id: id.to_string(),
            label: id.to_string(),
        });
        self.node_indices.insert(id.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node labels in insertion order.
    pub fn node_labels(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].label.as_str())
            .collect()
    }

    /// `(producer, consumer, label)` in insertion order.
    pub fn edges(&self) -> Vec<(&str, &str, &str)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].id.as_str(),
                    self.graph[e.target()].id.as_str(),
                    e.weight().label.as_str(),
                )
            })
            .collect()
    }

    pub fn successors(&self, node_id: &str) -> Vec<(&str, &BindingEdge)> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (self.graph[e.target()].id.as_str(), e.weight()))
            .collect()
    }

    pub fn predecessors(&self, node_id: &str) -> Vec<(&str, &BindingEdge)> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (self.graph[e.source()].id.as_str(), e.weight()))
            .collect()
    }

    /// Plain, serializable view used at the wasm boundary.
    pub fn view(&self) -> GraphView {
        GraphView {
            nodes: self
                .graph
                .node_indices()
                .map(|idx| self.graph[idx].clone())
                .collect(),
            edges: self
                .edges()
                .into_iter()
                .map(|(from, to, label)| EdgeView {
                    from: from.to_string(),
                    to: to.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }
    }
}

/// Two graphs are equal when they hold the same nodes and edges in the same order.
impl PartialEq for DependencyGraph {
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<CallNode>,
    pub edges: Vec<EdgeView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub from: String,
    pub to: String,
    pub label: String,
}
