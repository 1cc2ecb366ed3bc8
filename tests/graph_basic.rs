//! Integration tests for the connection graph view.

#[allow(dead_code)]
mod helpers;

use flowscan::parse::{self, WorkflowGraph};
use flowscan::report::RiskLevel;
use flowscan::analyze;
use helpers::*;
use serde_json::json;

#[test]
fn build_graph_from_fixture() {
    let json = include_str!("fixtures/support_bot.json");
    let document = parse::parse_document(json).expect("Should parse");
    let graph = WorkflowGraph::build(&document);

    // sticky note is not part of the graph
    assert_eq!(graph.node_indices.len(), 5);
    assert!(graph.dangling.is_empty());
    assert_eq!(graph.incoming_count("AI Agent"), 3);
    assert_eq!(graph.outgoing_count("AI Agent"), 1);
    assert_eq!(graph.successors("AI Agent")[0].0, "Send to API");
    assert_eq!(graph.outgoing_count("Send to API"), 0);

    let categories: Vec<&str> = graph
        .successors("OpenAI Chat Model")
        .iter()
        .map(|(_, e)| e.category.as_str())
        .collect();
    assert_eq!(categories, vec!["ai_languageModel"]);
}

#[test]
fn unknown_targets_are_dangling() {
    let raw = workflow(
        vec![node("A", "n8n-nodes-base.set")],
        json!({ "A": { "main": [[{ "node": "Missing", "type": "main", "index": 0 }]] },
                "Nobody": { "main": [[{ "node": "A", "type": "main", "index": 0 }]] } }),
    );
    let document = parse::parse_document(&raw).unwrap();
    let graph = WorkflowGraph::build(&document);
    assert_eq!(graph.dangling.len(), 2);
    assert_eq!(graph.graph.edge_count(), 0);
}

#[test]
fn risk_overlay_uses_worst_severity() {
    let raw = include_str!("fixtures/support_bot.json");
    let report = analyze(raw);
    let document = parse::parse_document(raw).unwrap();
    let overlay = WorkflowGraph::build(&document).risk_overlay(&report.findings);
    let risk_of = |name: &str| overlay.iter().find(|(n, _)| n == name).map(|(_, r)| *r);
    assert_eq!(risk_of("Send to API"), Some(RiskLevel::High));
    assert_eq!(risk_of("OpenAI Chat Model"), Some(RiskLevel::Medium));
    assert_eq!(risk_of("Window Buffer Memory"), Some(RiskLevel::Medium));
}
