//! Compiled pipeline tree: JSON → Rust types + dependency graph construction.

pub mod graph;
pub mod types;

pub use graph::{BindingEdge, CallNode, DependencyGraph, GraphView};
pub use types::*;

use crate::error::Result;

/// Deserialize a single pipeline declaration.
pub fn parse_pipeline(json: &str) -> Result<PipelineDeclaration> {
    Ok(serde_json::from_str::<PipelineDeclaration>(json)?)
}

/// Build the dependency graph for one declaration. Always starts from an empty graph.
pub fn build_graph(decl: &PipelineDeclaration) -> DependencyGraph {
    DependencyGraph::build(decl)
}

/// Parse JSON and build the graph in one step.
pub fn parse_and_build(json: &str) -> Result<(PipelineDeclaration, DependencyGraph)> {
    let decl = parse_pipeline(json)?;
    let graph = build_graph(&decl);
    Ok((decl, graph))
}
