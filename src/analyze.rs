//! Entry point: raw text → `ValidationReport`.
//!
//! parse → classify → {structural validation, connection count, rule engine}
//! → aggregate. Every failure mode ends up as data in the report.

use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::parse::{self, WorkflowDocument, WorkflowGraph};
use crate::report::{SecurityFinding, Summary, ValidationReport};
use crate::rules;
use crate::validate::{self, ValidationOutput};

/// Analyze raw workflow text with the default configuration.
pub fn analyze(raw: &str) -> ValidationReport {
    Analyzer::default().analyze(raw)
}

/// Report plus the normalized document it was computed from.
#[derive(Debug, Clone)]
pub struct Inspection {
    /// `None` when the input was rejected before normalization.
    pub document: Option<WorkflowDocument>,
    /// Graph the report was validated against; `None` with `document`.
    pub graph: Option<WorkflowGraph>,
    pub report: ValidationReport,
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Analyzer { config }
    }

    pub fn analyze(&self, raw: &str) -> ValidationReport {
        self.inspect(raw).report
    }

    #[tracing::instrument(skip_all, fields(input_len = raw.len()))]
    pub fn inspect(&self, raw: &str) -> Inspection {
        let document = match parse::parse_document(raw) {
            Ok(document) => document,
            Err(e) => {
                debug!(error = %e, "input rejected");
                return Inspection {
                    document: None,
                    graph: None,
                    report: ValidationReport::rejected(e.into()),
                };
            }
        };

        let graph = WorkflowGraph::build(&document);
        let validation = validate::validate_document(&document, &graph);
        let findings = rules::evaluate_document(&document, &self.config);
        debug!(
            errors = validation.errors.len(),
            warnings = validation.warnings.len(),
            findings = findings.len(),
            "analysis complete"
        );

        let report = aggregate(&document, validation, findings);
        Inspection {
            document: Some(document),
            graph: Some(graph),
            report,
        }
    }
}

fn aggregate(
    document: &WorkflowDocument,
    validation: ValidationOutput,
    findings: Vec<SecurityFinding>,
) -> ValidationReport {
    let summary = Summary {
        node_count: document.executable_nodes().count(),
        connection_count: validate::count_connections(document.connections.as_ref()),
        name: document.name.clone(),
        version: document.declared_version().map(String::from),
    };

    ValidationReport {
        is_valid: validation.errors.is_empty(),
        looks_like_workflow: true,
        errors: validation.errors,
        warnings: validation.warnings,
        info: validation.info,
        findings,
        summary: Some(summary),
    }
}
