//! Integration tests for dependency graph construction from compiled pipelines.

mod helpers;

use mro_editor::ast::{self, BindingStatement, CallStatement, DependencyGraph, PipelineDeclaration};
use mro_editor::diagnostic::parse_error_location;
use serde_json::json;

#[test]
fn literal_only_pipeline_has_no_edges() {
    let json = include_str!("fixtures/literal_only_pipeline.json");
    let (decl, graph) = ast::parse_and_build(json).expect("Should parse");
    assert_eq!(decl.calls.len(), 4);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.node_labels(), vec!["FETCH", "CHECK", "REPORT", "ARCHIVE"]);
}

#[test]
fn call_bindings_become_labelled_edges() {
    let build = helpers::count_reads_build();
    let graph = ast::build_graph(&build.pipelines[0]);

    assert_eq!(graph.node_count(), 3);
    assert_eq!(
        graph.edges(),
        vec![
            ("ALIGN_READS", "SORT_BAM", "bam"),
            ("SORT_BAM", "COUNT_READS", "bam"),
            ("ALIGN_READS", "COUNT_READS", "fastq"),
        ]
    );
    // `self` and literal bindings contribute nothing
    assert!(graph.predecessors("ALIGN_READS").is_empty());
}

#[test]
fn each_call_binding_yields_exactly_one_edge() {
    let decl = PipelineDeclaration::new(
        "P",
        vec![
            CallStatement::new("A", vec![]),
            CallStatement::new(
                "B",
                vec![
                    BindingStatement::call("left", "A"),
                    BindingStatement::call("right", "A"),
                    BindingStatement::literal("n", "int", json!(3)),
                ],
            ),
        ],
    );
    let graph = ast::build_graph(&decl);
    assert_eq!(graph.edges(), vec![("A", "B", "left"), ("A", "B", "right")]);
}

#[test]
fn rebuilding_does_not_accumulate() {
    let decl = helpers::chain(&["A", "B", "C"]);
    let first = ast::build_graph(&decl);
    let mut second = ast::build_graph(&decl);
    assert_eq!(first, second);
    assert_eq!(second.edge_count(), 2);

    // mutating one graph leaves the other alone
    second.graph.clear();
    assert_eq!(first.edge_count(), 2);
    assert_eq!(ast::build_graph(&decl), first);
}

#[test]
fn cycles_are_built_without_complaint() {
    let decl = PipelineDeclaration::new(
        "CYCLE",
        vec![
            CallStatement::new("A", vec![BindingStatement::call("back", "B")]),
            CallStatement::new("B", vec![BindingStatement::call("fwd", "A")]),
        ],
    );
    let graph = DependencyGraph::build(&decl);
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edges(), vec![("B", "A", "back"), ("A", "B", "fwd")]);
}

#[test]
fn graph_view_snapshot() {
    let graph = ast::build_graph(&helpers::chain(&["ALIGN", "SORT"]));
    insta::assert_json_snapshot!(graph.view(), @r###"
    {
      "nodes": [
        {
          "id": "ALIGN",
          "label": "ALIGN"
        },
        {
          "id": "SORT",
          "label": "SORT"
        }
      ],
      "edges": [
        {
          "from": "ALIGN",
          "to": "SORT",
          "label": "in_1"
        }
      ]
    }
    "###);
}

#[test]
fn parse_error_location_examples() {
    assert_eq!(parse_error_location("Syntax error on line 42: unexpected token"), Some(42));
    assert_eq!(parse_error_location("malformed input"), None);
}

#[test]
fn invalid_pipeline_json_is_decode_error() {
    let err = ast::parse_pipeline(r#"{"Calls": []}"#).unwrap_err();
    assert!(matches!(err, mro_editor::error::EditorError::Decode(_)));
}
