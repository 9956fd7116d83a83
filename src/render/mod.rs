//! Rendering collaborator contract and the post-render styling pass.
//!
//! A renderer draws a `DependencyGraph` into a named container and hands back
//! a `RenderedNodes` handle describing the node elements it created. Styling
//! is a pure function over that handle; the styled handle is then committed
//! back to the renderer.

pub mod dot;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::ast::DependencyGraph;

pub use dot::DotRenderer;

/// Corner radius applied to every node box.
pub const NODE_CORNER_RADIUS: u32 = 20;
/// Class marking a node as drawn in its finished state.
pub const COMPLETE_CLASS: &str = "complete";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeElement {
    /// Position of the node in the rendered graph.
    pub index: usize,
    pub id: String,
    pub label: String,
    pub classes: BTreeSet<String>,
    pub rx: u32,
    pub ry: u32,
}

/// Handle to the node elements created by one `render` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNodes {
    pub container_id: String,
    pub nodes: Vec<NodeElement>,
}

impl RenderedNodes {
    /// Unstyled handle for every node of `graph`, in graph order.
    pub fn from_graph(container_id: &str, graph: &DependencyGraph) -> Self {
        RenderedNodes {
            container_id: container_id.to_string(),
            nodes: graph
                .graph
                .node_indices()
                .map(|idx| NodeElement {
                    index: idx.index(),
                    id: graph.graph[idx].id.clone(),
                    label: graph.graph[idx].label.clone(),
                    classes: BTreeSet::new(),
                    rx: 0,
                    ry: 0,
                })
                .collect(),
        }
    }
}

pub trait Renderer {
    /// Draw `graph` into `container_id`, replacing whatever was there.
    fn render(&mut self, container_id: &str, graph: &DependencyGraph) -> RenderedNodes;

    /// Apply a (styled) handle previously returned by `render`.
    fn commit(&mut self, nodes: &RenderedNodes);
}

/// Round every node's corners and mark it complete.
pub fn style_nodes(mut rendered: RenderedNodes) -> RenderedNodes {
    for node in &mut rendered.nodes {
        node.rx = NODE_CORNER_RADIUS;
        node.ry = NODE_CORNER_RADIUS;
        node.classes.insert(COMPLETE_CLASS.to_string());
    }
    rendered
}

/// Render, style and commit in one step.
pub fn render_styled<R: Renderer + ?Sized>(
    renderer: &mut R,
    container_id: &str,
    graph: &DependencyGraph,
) -> RenderedNodes {
    let styled = style_nodes(renderer.render(container_id, graph));
    renderer.commit(&styled);
    styled
}
