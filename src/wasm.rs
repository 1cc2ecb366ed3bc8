//! WASM entry points for browser use.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::analyze::Analyzer;
use crate::config::AnalyzerConfig;
use crate::error::{Diagnostic, Phase};
use crate::report::{RiskLevel, ValidationReport, count_secure_nodes};
use crate::rules::CATALOG;

/// Analyze a workflow JSON with the default configuration.
/// Returns a serialized `ValidationReport`.
#[wasm_bindgen]
pub fn analyze_workflow(json: &str) -> JsValue {
    to_js(&analyze_inner(json, AnalyzerConfig::default()))
}

/// Analyze with a JSON-encoded `AnalyzerConfig`. An unreadable config is
/// reported as the report's single error.
#[wasm_bindgen]
pub fn analyze_workflow_with_config(json: &str, config_json: &str) -> JsValue {
    let config = match AnalyzerConfig::from_json(config_json) {
        Ok(c) => c,
        Err(e) => {
            let report = ValidationReport::rejected(Diagnostic {
                code: "C001".into(),
                phase: Phase::Parse,
                message: format!("Invalid analyzer config: {}", e),
                node_id: None,
            });
            return to_js(&AnalysisDto::from_report(report, 0));
        }
    };
    to_js(&analyze_inner(json, config))
}

/// Graph view for the renderer: nodes colored by worst severity plus edges.
#[wasm_bindgen]
pub fn workflow_graph(json: &str) -> JsValue {
    to_js(&graph_inner(json))
}

/// The rule catalog, for documentation panels.
#[wasm_bindgen]
pub fn rule_catalog() -> JsValue {
    to_js(&CATALOG)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn analyze_inner(json: &str, config: AnalyzerConfig) -> AnalysisDto {
    let inspection = Analyzer::new(config).inspect(json);
    let secure = inspection
        .document
        .as_ref()
        .map(|d| count_secure_nodes(d, &inspection.report.findings))
        .unwrap_or(0);
    AnalysisDto::from_report(inspection.report, secure)
}

fn graph_inner(json: &str) -> GraphDto {
    let inspection = Analyzer::default().inspect(json);
    let Some(graph) = inspection.graph else {
        return GraphDto::default();
    };
    let nodes = graph
        .risk_overlay(&inspection.report.findings)
        .into_iter()
        .map(|(name, risk)| NodeDto { name, risk })
        .collect();
    let edges = graph
        .graph
        .edge_indices()
        .filter_map(|e| {
            let (s, t) = graph.graph.edge_endpoints(e)?;
            Some(EdgeDto {
                source: graph.graph[s].clone(),
                target: graph.graph[t].clone(),
                category: graph.graph[e].category.clone(),
            })
        })
        .collect();
    GraphDto { nodes, edges }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisDto {
    #[serde(flatten)]
    report: ValidationReport,
    secure_node_count: usize,
}

impl AnalysisDto {
    fn from_report(report: ValidationReport, secure_node_count: usize) -> Self {
        AnalysisDto {
            report,
            secure_node_count,
        }
    }
}

#[derive(Serialize, Default)]
struct GraphDto {
    nodes: Vec<NodeDto>,
    edges: Vec<EdgeDto>,
}

#[derive(Serialize)]
struct NodeDto {
    name: String,
    risk: RiskLevel,
}

#[derive(Serialize)]
struct EdgeDto {
    source: String,
    target: String,
    category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_colors_nodes_by_worst_finding() {
        let json = r#"{
            "nodes": [
                {"id":"1","name":"Fetch","type":"n8n-nodes-base.httpRequest","typeVersion":4,
                 "parameters":{"url":"http://example.com"}},
                {"id":"2","name":"Set","type":"n8n-nodes-base.set","typeVersion":3}
            ],
            "connections": {"Fetch":{"main":[[{"node":"Set","type":"main","index":0}]]}}
        }"#;
        let dto = graph_inner(json);
        let risks: Vec<(&str, RiskLevel)> = dto.nodes.iter().map(|n| (n.name.as_str(), n.risk)).collect();
        assert_eq!(risks, vec![("Fetch", RiskLevel::High), ("Set", RiskLevel::Safe)]);
        assert_eq!(dto.edges.len(), 1);
        assert_eq!(dto.edges[0].category, "main");
    }

    #[test]
    fn secure_node_count_is_attached() {
        let dto = analyze_inner(
            r#"{"nodes":[{"id":"1","type":"n8n-nodes-base.set","typeVersion":1}],"connections":{}}"#,
            AnalyzerConfig::default(),
        );
        assert_eq!(dto.secure_node_count, 1);
        assert!(dto.report.is_valid);
    }
}
