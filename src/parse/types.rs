//! Typed view of an exported workflow document.
//!
//! Exports in the wild are loosely shaped, so construction never fails:
//! fields that are absent or have an unexpected shape come through as `None`
//! (or an empty collection) and are reported by the validator instead.

use serde::Serialize;
use serde_json::{Map, Value};

/// Type marker of non-executing annotation nodes.
const ANNOTATION_MARKER: &str = "stickynote";

// =============================================================================
// TOP-LEVEL WORKFLOW
// =============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    pub name: Option<String>,
    /// `None` when the document has no `nodes` sequence.
    pub nodes: Option<Vec<Node>>,
    /// `None` when the document has no `connections` mapping.
    pub connections: Option<ConnectionMap>,
    pub meta: Option<WorkflowMeta>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMeta {
    pub instance_id: Option<String>,
    pub template_creds_setup_completed: Option<bool>,
    pub version: Option<String>,
}

impl WorkflowDocument {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return WorkflowDocument::default();
        };

        WorkflowDocument {
            name: string_field(obj, "name"),
            nodes: obj
                .get("nodes")
                .and_then(Value::as_array)
                .map(|nodes| nodes.iter().map(Node::from_value).collect()),
            connections: obj
                .get("connections")
                .and_then(Value::as_object)
                .map(ConnectionMap::from_object),
            meta: obj
                .get("meta")
                .and_then(Value::as_object)
                .map(WorkflowMeta::from_object),
            version_id: string_field(obj, "versionId"),
        }
    }

    /// Nodes in document order; empty when the document has none.
    pub fn nodes(&self) -> &[Node] {
        self.nodes.as_deref().unwrap_or(&[])
    }

    /// Nodes that take part in execution (annotations excluded).
    pub fn executable_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes().iter().filter(|n| !n.is_annotation())
    }

    /// Declared version: `versionId`, else `meta.version`.
    pub fn declared_version(&self) -> Option<&str> {
        self.version_id
            .as_deref()
            .or_else(|| self.meta.as_ref().and_then(|m| m.version.as_deref()))
    }
}

impl WorkflowMeta {
    fn from_object(obj: &Map<String, Value>) -> Self {
        WorkflowMeta {
            instance_id: string_field(obj, "instanceId"),
            template_creds_setup_completed: obj
                .get("templateCredsSetupCompleted")
                .and_then(Value::as_bool),
            version: string_field(obj, "version"),
        }
    }
}

// =============================================================================
// NODE
// =============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub type_version: Option<f64>,
    pub parameters: Map<String, Value>,
    pub credentials: Option<Map<String, Value>>,
    pub position: Option<Position>,
    pub webhook_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Node {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Node::default();
        };

        Node {
            id: string_field(obj, "id"),
            name: string_field(obj, "name"),
            node_type: string_field(obj, "type"),
            type_version: obj.get("typeVersion").and_then(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }),
            parameters: obj
                .get("parameters")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            credentials: obj.get("credentials").and_then(Value::as_object).cloned(),
            position: obj.get("position").and_then(Position::from_value),
            webhook_id: string_field(obj, "webhookId"),
        }
    }

    pub fn node_type(&self) -> &str {
        self.node_type.as_deref().unwrap_or("")
    }

    /// Label used in messages and grouping: name, else id.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }

    pub fn is_annotation(&self) -> bool {
        self.node_type().to_ascii_lowercase().contains(ANNOTATION_MARKER)
    }

    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key).filter(|v| !v.is_null())
    }

    pub fn parameter_str(&self, key: &str) -> Option<&str> {
        self.parameter(key).and_then(Value::as_str)
    }
}

impl Position {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(xy) if xy.len() == 2 => Some(Position {
                x: xy[0].as_f64()?,
                y: xy[1].as_f64()?,
            }),
            Value::Object(obj) => Some(Position {
                x: obj.get("x")?.as_f64()?,
                y: obj.get("y")?.as_f64()?,
            }),
            _ => None,
        }
    }
}

// =============================================================================
// CONNECTIONS
// =============================================================================

/// source node name → category → output slots → edges.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConnectionMap {
    pub sources: Vec<SourceConnections>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceConnections {
    pub source: String,
    pub categories: Vec<CategoryConnections>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryConnections {
    pub category: String,
    pub slots: Vec<Vec<ConnectionEdge>>,
}

/// Target descriptor of one edge. Every element of an edge list becomes an
/// edge, even when it is not an object, so that counts match the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEdge {
    pub node: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub index: Option<u64>,
}

impl ConnectionMap {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let sources = obj
            .iter()
            .filter_map(|(source, categories)| {
                let categories = categories.as_object()?;
                Some(SourceConnections {
                    source: source.clone(),
                    categories: categories
                        .iter()
                        .filter_map(|(category, slots)| {
                            Some(CategoryConnections {
                                category: category.clone(),
                                slots: slots
                                    .as_array()?
                                    .iter()
                                    .filter_map(Value::as_array)
                                    .map(|edges| edges.iter().map(ConnectionEdge::from_value).collect())
                                    .collect(),
                            })
                        })
                        .collect(),
                })
            })
            .collect();

        ConnectionMap { sources }
    }

    /// All edges as `(source, category, slot, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, usize, &ConnectionEdge)> {
        self.sources.iter().flat_map(|s| {
            s.categories.iter().flat_map(move |c| {
                c.slots.iter().enumerate().flat_map(move |(slot, edges)| {
                    edges
                        .iter()
                        .map(move |e| (s.source.as_str(), c.category.as_str(), slot, e))
                })
            })
        })
    }
}

impl ConnectionEdge {
    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return ConnectionEdge::default();
        };
        ConnectionEdge {
            node: string_field(obj, "node"),
            category: string_field(obj, "type"),
            index: obj.get("index").and_then(Value::as_u64),
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Reads a non-empty string field; numbers are accepted and stringified.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
