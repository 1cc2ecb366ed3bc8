//! petgraph-based directed graph over the document's connection map.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use super::types::WorkflowDocument;
use crate::report::{RiskLevel, SecurityFinding};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeLabel {
    pub category: String,
    pub slot: usize,
}

/// An edge whose source or target is not a node of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingEdge {
    pub source: String,
    pub target: Option<String>,
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    pub node_indices: HashMap<String, NodeIndex>,
    pub dangling: Vec<DanglingEdge>,
}

impl WorkflowGraph {
    /// Nodes are keyed by display name since connections reference names.
    pub fn build(document: &WorkflowDocument) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut dangling = Vec::new();

        for node in document.executable_nodes() {
            let Some(key) = node.display_name() else {
                continue;
            };
            if node_indices.contains_key(key) {
                continue;
            }
            let idx = graph.add_node(key.to_string());
            node_indices.insert(key.to_string(), idx);
        }

        if let Some(connections) = &document.connections {
            for (source, category, slot, edge) in connections.edges() {
                let source_idx = node_indices.get(source);
                let target_idx = edge.node.as_deref().and_then(|t| node_indices.get(t));

                match (source_idx, target_idx) {
                    (Some(&s), Some(&t)) => {
                        graph.add_edge(
                            s,
                            t,
                            EdgeLabel {
                                category: category.to_string(),
                                slot,
                            },
                        );
                    }
                    _ => dangling.push(DanglingEdge {
                        source: source.to_string(),
                        target: edge.node.clone(),
                        category: category.to_string(),
                    }),
                }
            }
        }

        WorkflowGraph {
            graph,
            node_indices,
            dangling,
        }
    }

    pub fn successors(&self, node: &str) -> Vec<(&str, &EdgeLabel)> {
        let Some(&idx) = self.node_indices.get(node) else {
            return vec![];
        };
        self.graph
            .edges_directed(idx, petgraph::Direction::Outgoing)
            .map(|e| (self.graph[e.target()].as_str(), e.weight()))
            .collect()
    }

    pub fn predecessors(&self, node: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(node) else {
            return vec![];
        };
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    pub fn incoming_count(&self, node: &str) -> usize {
        self.predecessors(node).len()
    }

    pub fn outgoing_count(&self, node: &str) -> usize {
        self.successors(node).len()
    }

    /// Worst severity per node, in graph insertion order, for coloring.
    pub fn risk_overlay(&self, findings: &[SecurityFinding]) -> Vec<(String, RiskLevel)> {
        self.graph
            .node_indices()
            .map(|idx| {
                let name = &self.graph[idx];
                let risk = RiskLevel::worst(
                    findings
                        .iter()
                        .filter(|f| f.node_name.as_deref() == Some(name.as_str())),
                );
                (name.clone(), risk)
            })
            .collect()
    }
}
