//! Security rule engine.
//!
//! The catalog is a fixed, ordered table of independent detectors. Each one
//! looks at a single node and yields zero or more detections; the engine turns
//! those into findings uniformly. Detectors never fail: an unexpected
//! parameter shape simply means the trigger condition is not met.

pub mod catalog;
pub mod matchers;
pub mod sensitive;

use serde::Serialize;
use tracing::trace;

use crate::config::AnalyzerConfig;
use crate::parse::types::{Node, WorkflowDocument};
use crate::report::{SecurityFinding, Severity};

pub use catalog::CATALOG;

/// One catalog entry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub code: &'static str,
    pub category: &'static str,
    /// Severity of every detection unless the detection overrides it.
    pub severity: Severity,
    pub description: &'static str,
    pub remediation: &'static [&'static str],
    #[serde(skip)]
    pub detect: fn(&RuleContext<'_>) -> Vec<Detection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub message: String,
    pub severity: Option<Severity>,
}

impl Detection {
    pub fn new(message: impl Into<String>) -> Self {
        Detection {
            message: message.into(),
            severity: None,
        }
    }

    pub fn with_severity(severity: Severity, message: impl Into<String>) -> Self {
        Detection {
            message: message.into(),
            severity: Some(severity),
        }
    }
}

/// What a detector sees: the node, its lowercased type and the config.
pub struct RuleContext<'a> {
    pub node: &'a Node,
    pub node_type: String,
    pub config: &'a AnalyzerConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(node: &'a Node, config: &'a AnalyzerConfig) -> Self {
        RuleContext {
            node,
            node_type: node.node_type().to_ascii_lowercase(),
            config,
        }
    }

    /// Case-insensitive substring test against the node type.
    pub fn type_has(&self, needle: &str) -> bool {
        self.node_type.contains(needle)
    }

    pub fn type_has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.type_has(n))
    }
}

impl Rule {
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<SecurityFinding> {
        (self.detect)(ctx)
            .into_iter()
            .map(|d| {
                trace!(rule = self.code, node = ?ctx.node.display_name(), "rule matched");
                SecurityFinding {
                    rule: self.code,
                    severity: d.severity.unwrap_or(self.severity),
                    category: self.category,
                    message: d.message,
                    description: self.description,
                    remediation: self.remediation.to_vec(),
                    node_id: ctx.node.id.clone(),
                    node_name: ctx.node.display_name().map(String::from),
                }
            })
            .collect()
    }
}

/// Run every catalog rule against one node. Annotation nodes yield nothing.
pub fn evaluate_node(node: &Node, config: &AnalyzerConfig) -> Vec<SecurityFinding> {
    if node.is_annotation() {
        return vec![];
    }
    let ctx = RuleContext::new(node, config);
    CATALOG.iter().flat_map(|rule| rule.evaluate(&ctx)).collect()
}

/// Run the catalog over every node of the document, in document order.
pub fn evaluate_document(document: &WorkflowDocument, config: &AnalyzerConfig) -> Vec<SecurityFinding> {
    document
        .nodes()
        .iter()
        .flat_map(|node| evaluate_node(node, config))
        .collect()
}

pub fn find_rule(code: &str) -> Option<&'static Rule> {
    CATALOG.iter().find(|r| r.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_codes_are_unique_and_ordered() {
        let codes: Vec<&str> = CATALOG.iter().map(|r| r.code).collect();
        let expected: Vec<String> = (1..=CATALOG.len()).map(|i| format!("R{:02}", i)).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn annotation_nodes_skip_the_catalog() {
        let node = Node::from_value(&json!({
            "id": "note",
            "type": "n8n-nodes-base.stickyNote",
            "parameters": { "content": "password: hunter2" }
        }));
        assert!(evaluate_node(&node, &AnalyzerConfig::default()).is_empty());
    }

    #[test]
    fn findings_carry_node_identity() {
        let node = Node::from_value(&json!({
            "id": "n1",
            "name": "Run JS",
            "type": "n8n-nodes-base.code"
        }));
        let findings = evaluate_node(&node, &AnalyzerConfig::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].node_id.as_deref(), Some("n1"));
        assert_eq!(findings[0].node_name.as_deref(), Some("Run JS"));
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn find_rule_by_code() {
        assert_eq!(find_rule("R14").map(|r| r.category), Some("External HTTP Request"));
        assert!(find_rule("R99").is_none());
    }
}
