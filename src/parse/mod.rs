//! Parse phase: raw text → JSON value → typed `WorkflowDocument`.

pub mod graph;
pub mod types;

pub use graph::WorkflowGraph;
pub use types::*;

use serde_json::Value;

use crate::error::InputError;

/// Strictly parse raw text as JSON.
pub fn parse(raw: &str) -> Result<Value, InputError> {
    if raw.trim().is_empty() {
        return Err(InputError::Empty);
    }
    serde_json::from_str::<Value>(raw).map_err(|e| InputError::Syntax(e.to_string()))
}

/// A value is workflow-like when it is an object exposing `nodes`,
/// `connections`, `meta.instanceId` or `name`.
pub fn looks_like_workflow(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let present = |key: &str| obj.get(key).is_some_and(|v| !v.is_null());
    let has_instance_id = obj
        .get("meta")
        .and_then(|m| m.get("instanceId"))
        .is_some_and(|v| !v.is_null());

    present("nodes") || present("connections") || has_instance_id || present("name")
}

/// Parse, classify and normalize in one step.
pub fn parse_document(raw: &str) -> Result<WorkflowDocument, InputError> {
    let value = parse(raw)?;
    if !looks_like_workflow(&value) {
        return Err(InputError::NotAWorkflow);
    }
    Ok(WorkflowDocument::from_value(&value))
}
