use flowscan::report::{SecurityFinding, ValidationReport};
use serde_json::{Value, json};

// =============================================================================
// Document builders
// =============================================================================

/// A complete node with id, name, type and typeVersion.
pub fn node(id: &str, node_type: &str) -> Value {
    json!({
        "id": id,
        "name": id,
        "type": node_type,
        "typeVersion": 1,
        "parameters": {}
    })
}

pub fn node_with_params(id: &str, node_type: &str, parameters: Value) -> Value {
    let mut n = node(id, node_type);
    n["parameters"] = parameters;
    n
}

/// Serialized workflow with the given nodes and connections.
pub fn workflow(nodes: Vec<Value>, connections: Value) -> String {
    json!({ "name": "Test Workflow", "nodes": nodes, "connections": connections }).to_string()
}

pub fn single_node(n: Value) -> String {
    workflow(vec![n], json!({}))
}

// =============================================================================
// Report queries
// =============================================================================

pub fn findings_in<'a>(report: &'a ValidationReport, category: &str) -> Vec<&'a SecurityFinding> {
    report
        .findings
        .iter()
        .filter(|f| f.category == category)
        .collect()
}

pub fn categories(report: &ValidationReport) -> Vec<&'static str> {
    report.findings.iter().map(|f| f.category).collect()
}

pub fn error_codes(report: &ValidationReport) -> Vec<&str> {
    report.errors.iter().map(|e| e.code.as_str()).collect()
}
