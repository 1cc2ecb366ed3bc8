//! Report types produced by `analyze` and the projections consumers need.

use serde::Serialize;

use crate::error::Diagnostic;
use crate::parse::types::{Node, WorkflowDocument};

/// Placeholder group key for findings without a node name.
pub const UNKNOWN_NODE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Display rollup of a node: `High > Medium > Low > Safe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
}

impl From<Severity> for RiskLevel {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Low => RiskLevel::Low,
            Severity::Medium => RiskLevel::Medium,
            Severity::High => RiskLevel::High,
        }
    }
}

impl RiskLevel {
    pub fn worst<'a>(findings: impl IntoIterator<Item = &'a SecurityFinding>) -> Self {
        findings
            .into_iter()
            .map(|f| RiskLevel::from(f.severity))
            .max()
            .unwrap_or(RiskLevel::Safe)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityFinding {
    pub rule: &'static str,
    pub severity: Severity,
    pub category: &'static str,
    pub message: String,
    pub description: &'static str,
    pub remediation: Vec<&'static str>,
    pub node_id: Option<String>,
    pub node_name: Option<String>,
}

impl SecurityFinding {
    pub fn group_key(&self) -> &str {
        self.node_name.as_deref().unwrap_or(UNKNOWN_NODE)
    }

    pub fn is_for(&self, node: &Node) -> bool {
        self.node_id == node.id && self.node_name.as_deref() == node.display_name()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub node_count: usize,
    pub connection_count: usize,
    pub name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub looks_like_workflow: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub info: Vec<Diagnostic>,
    pub findings: Vec<SecurityFinding>,
    pub summary: Option<Summary>,
}

impl ValidationReport {
    /// Report for input that never reached structural validation.
    pub fn rejected(error: Diagnostic) -> Self {
        ValidationReport {
            is_valid: false,
            looks_like_workflow: false,
            errors: vec![error],
            warnings: vec![],
            info: vec![],
            findings: vec![],
            summary: None,
        }
    }

    /// Findings grouped by node name, in first-appearance order.
    pub fn findings_by_node(&self) -> Vec<(&str, Vec<&SecurityFinding>)> {
        let mut groups: Vec<(&str, Vec<&SecurityFinding>)> = Vec::new();
        for finding in &self.findings {
            let key = finding.group_key();
            match groups.iter().position(|(k, _)| *k == key) {
                Some(i) => groups[i].1.push(finding),
                None => groups.push((key, vec![finding])),
            }
        }
        groups
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for f in &self.findings {
            match f.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn node_risk(&self, node_name: &str) -> RiskLevel {
        RiskLevel::worst(self.findings.iter().filter(|f| f.group_key() == node_name))
    }
}

/// Number of non-annotation nodes with no associated finding.
pub fn count_secure_nodes(document: &WorkflowDocument, findings: &[SecurityFinding]) -> usize {
    document
        .executable_nodes()
        .filter(|node| !findings.iter().any(|f| f.is_for(node)))
        .count()
}
