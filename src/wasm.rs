//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::ast::{self, GraphView};
use crate::error::EditorError;
use crate::render::{DotRenderer, render_styled};
use crate::session::BuildResult;

/// Build the dependency graph of one pipeline declaration JSON.
/// Returns `{ status: "success", nodes, edges }` or `{ status: "errors", errors }`.
#[wasm_bindgen]
pub fn dependency_graph(pipeline_json: &str) -> JsValue {
    let result = dependency_graph_inner(pipeline_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn dependency_graph_inner(pipeline_json: &str) -> GraphResult {
    match ast::parse_and_build(pipeline_json) {
        Ok((_, graph)) => GraphResult::Success(graph.view()),
        Err(e) => GraphResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

/// Styled Graphviz DOT for one pipeline declaration JSON, or `undefined` on bad input.
#[wasm_bindgen]
pub fn dependency_graph_dot(pipeline_json: &str) -> Option<String> {
    dependency_graph_dot_inner(pipeline_json)
}

fn dependency_graph_dot_inner(pipeline_json: &str) -> Option<String> {
    let (decl, graph) = ast::parse_and_build(pipeline_json).ok()?;
    let mut renderer = DotRenderer::new();
    render_styled(&mut renderer, &decl.id, &graph);
    renderer.output(&decl.id).map(str::to_string)
}

/// Decode a raw build response body for display.
#[wasm_bindgen]
pub fn interpret_build(body: &str) -> JsValue {
    let result = interpret_build_inner(body);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn interpret_build_inner(body: &str) -> BuildDto {
    match BuildResult::from_json(body) {
        Ok(BuildResult::CompileError { message }) => BuildDto::CompileError {
            line: crate::diagnostic::parse_error_location(&message),
            message,
        },
        Ok(BuildResult::CompileSuccess(success)) => BuildDto::CompileSuccess {
            summary: crate::format::build_summary(&success),
            pipelines: success.pipelines.iter().map(|p| p.id.clone()).collect(),
        },
        Err(e) => BuildDto::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

#[wasm_bindgen]
pub fn error_location(message: &str) -> Option<u32> {
    crate::diagnostic::parse_error_location(message)
}

#[wasm_bindgen]
pub fn shorten(s: &str) -> String {
    crate::format::shorten(s)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct ErrorDto {
    kind: &'static str,
    message: String,
}

impl From<EditorError> for ErrorDto {
    fn from(e: EditorError) -> Self {
        let kind = match &e {
            EditorError::UserInput(_) => "userInput",
            EditorError::Transport(_) => "transport",
            EditorError::Decode(_) => "decode",
            EditorError::Config(_) => "config",
        };
        ErrorDto {
            kind,
            message: e.to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum GraphResult {
    #[serde(rename = "success")]
    Success(GraphView),
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum BuildDto {
    #[serde(rename = "compileError")]
    CompileError { message: String, line: Option<u32> },
    #[serde(rename = "compileSuccess")]
    CompileSuccess { summary: String, pipelines: Vec<String> },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}
