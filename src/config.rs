//! Analyzer configuration supplied by the embedding host.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Depth bound for the sensitive-data parameter scan.
    pub max_scan_depth: usize,
    /// Excessive Agency fires above this many tools.
    pub max_agent_tools: usize,
    pub include_credential_advisories: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            max_scan_depth: 32,
            max_agent_tools: 5,
            include_credential_advisories: true,
        }
    }
}

impl AnalyzerConfig {
    /// Parse a JSON config; blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(AnalyzerConfig::default());
        }
        serde_json::from_str(json)
    }
}
