//! Structural validation phase.
//!
//! Checks required fields independently of the security rules. Produces
//! errors, warnings and info entries; never stops early.

pub mod connections;
pub mod structural;

use crate::error::Diagnostic;
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::WorkflowDocument;

pub use connections::count_connections;

#[derive(Debug, Clone, Default)]
pub struct ValidationOutput {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub info: Vec<Diagnostic>,
}

/// Validate a workflow-like document.
pub fn validate_document(document: &WorkflowDocument, graph: &WorkflowGraph) -> ValidationOutput {
    let mut out = ValidationOutput::default();
    structural::validate_structural(document, &mut out);
    connections::report_dangling(graph, &mut out.info);
    out
}
