//! Connection counting and dangling-reference reporting.

use crate::error::Diagnostic;
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::ConnectionMap;

/// Total number of edges across all sources, categories and output slots.
/// Branches with an unexpected shape were dropped at parse time and count 0.
pub fn count_connections(connections: Option<&ConnectionMap>) -> usize {
    let Some(connections) = connections else {
        return 0;
    };
    connections
        .sources
        .iter()
        .flat_map(|s| &s.categories)
        .flat_map(|c| &c.slots)
        .map(Vec::len)
        .sum()
}

pub(crate) fn report_dangling(graph: &WorkflowGraph, info: &mut Vec<Diagnostic>) {
    for edge in &graph.dangling {
        let message = match &edge.target {
            Some(target) => format!(
                "Connection '{}' from '{}' references unknown node '{}'",
                edge.category, edge.source, target
            ),
            None => format!(
                "Connection '{}' from '{}' has no target node",
                edge.category, edge.source
            ),
        };
        info.push(Diagnostic::validate("I001", message, None));
    }
}
