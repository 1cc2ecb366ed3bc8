//! Error and diagnostic types shared by every analysis phase.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Parse,
    Shape,
    Validate,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Shape => write!(f, "Shape"),
            Phase::Validate => write!(f, "Validate"),
        }
    }
}

/// Terminal failures: once one of these is hit, nothing else is analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please provide JSON input")]
    Empty,
    #[error("Invalid JSON: {0}")]
    Syntax(String),
    #[error(
        "This does not look like a workflow export (no nodes, connections, meta.instanceId or name found)"
    )]
    NotAWorkflow,
}

impl InputError {
    pub fn code(&self) -> &'static str {
        match self {
            InputError::Empty => "P000",
            InputError::Syntax(_) => "P001",
            InputError::NotAWorkflow => "S001",
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            InputError::Empty | InputError::Syntax(_) => Phase::Parse,
            InputError::NotAWorkflow => Phase::Shape,
        }
    }
}

/// One error, warning or info entry of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub node_id: Option<String>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(
                f,
                "[{}:{}] {} (node '{}')",
                self.phase, self.code, self.message, id
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl From<InputError> for Diagnostic {
    fn from(e: InputError) -> Self {
        Diagnostic {
            code: e.code().into(),
            phase: e.phase(),
            message: e.to_string(),
            node_id: None,
        }
    }
}

impl Diagnostic {
    pub fn validate(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Diagnostic {
            code: code.into(),
            phase: Phase::Validate,
            message: message.into(),
            node_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_maps_to_single_diagnostic() {
        let d = Diagnostic::from(InputError::Syntax("expected value at line 1 column 1".into()));
        assert_eq!(d.code, "P001");
        assert_eq!(d.phase, Phase::Parse);
        assert!(d.message.starts_with("Invalid JSON:"));
    }

    #[test]
    fn display_includes_node_when_present() {
        let d = Diagnostic::validate("V004", "Node is missing required field: type", Some("n1".into()));
        assert_eq!(
            d.to_string(),
            "[Validate:V004] Node is missing required field: type (node 'n1')"
        );
    }
}
