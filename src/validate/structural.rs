//! Required-field rules (V001–V004, W001).

use crate::error::Diagnostic;
use crate::parse::types::{Node, WorkflowDocument};

use super::ValidationOutput;

/// Run all structural rules, appending to `out`.
pub fn validate_structural(document: &WorkflowDocument, out: &mut ValidationOutput) {
    v001_nodes_is_sequence(document, &mut out.errors);
    v002_connections_is_mapping(document, &mut out.errors);

    for (index, node) in document.nodes().iter().enumerate() {
        v003_node_has_id(index, node, &mut out.errors);
        v004_node_has_type(index, node, &mut out.errors);
        w001_node_has_type_version(index, node, &mut out.warnings);
    }
}

fn v001_nodes_is_sequence(document: &WorkflowDocument, errors: &mut Vec<Diagnostic>) {
    if document.nodes.is_none() {
        errors.push(Diagnostic::validate(
            "V001",
            "Missing or invalid nodes array",
            None,
        ));
    }
}

fn v002_connections_is_mapping(document: &WorkflowDocument, errors: &mut Vec<Diagnostic>) {
    if document.connections.is_none() {
        errors.push(Diagnostic::validate(
            "V002",
            "Missing or invalid connections object",
            None,
        ));
    }
}

fn v003_node_has_id(index: usize, node: &Node, errors: &mut Vec<Diagnostic>) {
    if node.id.is_none() {
        errors.push(Diagnostic::validate(
            "V003",
            format!("Node at index {} is missing required field: id", index),
            None,
        ));
    }
}

fn v004_node_has_type(index: usize, node: &Node, errors: &mut Vec<Diagnostic>) {
    if node.node_type.is_none() {
        errors.push(Diagnostic::validate(
            "V004",
            format!(
                "Node '{}' is missing required field: type",
                label(index, node)
            ),
            node.id.clone(),
        ));
    }
}

fn w001_node_has_type_version(index: usize, node: &Node, warnings: &mut Vec<Diagnostic>) {
    if node.type_version.is_none() {
        warnings.push(Diagnostic::validate(
            "W001",
            format!("Node '{}' is missing typeVersion", label(index, node)),
            node.id.clone(),
        ));
    }
}

fn label(index: usize, node: &Node) -> String {
    match node.display_name() {
        Some(name) => name.to_string(),
        None => format!("#{}", index),
    }
}
