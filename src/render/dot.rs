//! Graphviz DOT renderer.
//!
//! Each container holds one DOT document. Nodes are addressed by their graph
//! index so duplicate call ids still draw as separate boxes.

use std::collections::HashMap;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};

use super::{NodeElement, RenderedNodes, Renderer};
use crate::ast::{BindingEdge, CallNode, DependencyGraph};

#[derive(Debug, Default)]
pub struct DotRenderer {
    graphs: HashMap<String, DependencyGraph>,
    output: HashMap<String, String>,
}

impl DotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current DOT document for `container_id`.
    pub fn output(&self, container_id: &str) -> Option<&str> {
        self.output.get(container_id).map(String::as_str)
    }

    fn emit(
        container_id: &str,
        graph: &DependencyGraph,
        styles: Option<&[NodeElement]>,
    ) -> String {
        let node_attrs = |_: &CallGraph, (idx, _): (NodeIndex, &CallNode)| {
            let Some(element) = styles.and_then(|s| s.get(idx.index())) else {
                return String::new();
            };
            let mut attrs = String::new();
            if element.rx > 0 || element.ry > 0 {
                attrs.push_str("style=rounded ");
            }
            if !element.classes.is_empty() {
                let classes: Vec<&str> = element.classes.iter().map(String::as_str).collect();
                attrs.push_str(&format!("class={:?} ", classes.join(" ")));
            }
            attrs
        };
        let dot = Dot::with_attr_getters(
            &graph.graph,
            &[Config::GraphContentOnly],
            &no_edge_attrs,
            &node_attrs,
        );
        format!("digraph {:?} {{\n    node [shape=box];\n{}}}\n", container_id, dot)
    }
}

type CallGraph = DiGraph<CallNode, BindingEdge>;

fn no_edge_attrs(_: &CallGraph, _: EdgeReference<'_, BindingEdge>) -> String {
    String::new()
}

impl Renderer for DotRenderer {
    fn render(&mut self, container_id: &str, graph: &DependencyGraph) -> RenderedNodes {
        let dot = Self::emit(container_id, graph, None);
        self.output.insert(container_id.to_string(), dot);
        self.graphs.insert(container_id.to_string(), graph.clone());
        RenderedNodes::from_graph(container_id, graph)
    }

    fn commit(&mut self, nodes: &RenderedNodes) {
        let Some(graph) = self.graphs.get(&nodes.container_id) else {
            tracing::warn!(
                container = %nodes.container_id,
                "commit for a container that was never rendered"
            );
            return;
        };
        let dot = Self::emit(&nodes.container_id, graph, Some(&nodes.nodes));
        self.output.insert(nodes.container_id.clone(), dot);
    }
}
