//! Sensitive-value scan over a node's parameter tree.
//!
//! Uses an explicit worklist with a depth bound instead of recursion.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

static PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("API key", r"(?i)api[_\-\s]?key"),
        ("password", r"(?i)passw(?:or)?d"),
        ("secret", r"(?i)secret"),
        ("token", r"(?i)token"),
        (
            "private key",
            r"(?i)private[_\-\s]?key|-----BEGIN [A-Z ]*PRIVATE KEY-----",
        ),
        ("SSN", r"(?i)(?:^|[^a-z])ssn(?:[^a-z]|$)|\b\d{3}-\d{2}-\d{4}\b"),
        ("credit card", r"(?i)credit[_\-\s]?card"),
        ("card number", r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b"),
    ]
    .into_iter()
    .map(|(label, pattern)| (label, Regex::new(pattern).expect("valid regex")))
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitiveMatch {
    pub label: &'static str,
    /// Dotted path of the parameter, e.g. `headers.values[0].value`.
    pub path: String,
}

/// Every (string value, pattern) pair that matches, in document order.
/// Values nested deeper than `max_depth` are not visited.
pub fn scan(parameters: &Map<String, Value>, max_depth: usize) -> Vec<SensitiveMatch> {
    let mut matches = Vec::new();
    let mut stack: Vec<(String, &Value, usize)> = parameters
        .iter()
        .rev()
        .map(|(k, v)| (k.clone(), v, 1))
        .collect();

    while let Some((path, value, depth)) = stack.pop() {
        match value {
            Value::String(s) => {
                for (label, re) in PATTERNS.iter() {
                    if re.is_match(s) {
                        matches.push(SensitiveMatch {
                            label: *label,
                            path: path.clone(),
                        });
                    }
                }
            }
            Value::Array(items) if depth < max_depth => {
                for (i, item) in items.iter().enumerate().rev() {
                    stack.push((format!("{}[{}]", path, i), item, depth + 1));
                }
            }
            Value::Object(obj) if depth < max_depth => {
                for (k, v) in obj.iter().rev() {
                    stack.push((format!("{}.{}", path, k), v, depth + 1));
                }
            }
            Value::Array(_) | Value::Object(_) => {
                debug!(path = %path, max_depth, "parameter scan depth limit reached");
            }
            _ => {}
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn finds_nested_values_with_paths() {
        let p = params(json!({
            "headers": { "values": [{ "name": "X-Api", "value": "my api_key here" }] },
            "body": "plain"
        }));
        let found = scan(&p, 32);
        assert_eq!(
            found,
            vec![SensitiveMatch {
                label: "API key",
                path: "headers.values[0].value".into()
            }]
        );
    }

    #[test]
    fn one_match_per_pattern_per_string() {
        let p = params(json!({ "note": "password and secret token" }));
        let labels: Vec<&str> = scan(&p, 32).iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["password", "secret", "token"]);
    }

    #[test]
    fn card_number_and_ssn() {
        let p = params(json!({ "a": "4111 1111 1111 1111", "b": "123-45-6789" }));
        let labels: Vec<&str> = scan(&p, 32).iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["card number", "SSN"]);
    }

    #[test]
    fn ssn_keyword_inside_identifiers() {
        let p = params(json!({
            "a": "{{ $json.customer_ssn }}",
            "b": "SSN-lookup",
            "c": "className"
        }));
        let matches = scan(&p, 32);
        let paths: Vec<&str> = matches
            .iter()
            .filter(|m| m.label == "SSN")
            .map(|m| m.path.as_str())
            .collect();
        assert_eq!(paths, vec!["a", "b"]);
    }

    #[test]
    fn keys_are_not_scanned() {
        let p = params(json!({ "password": 12, "apiKey": true }));
        assert!(scan(&p, 32).is_empty());
    }

    #[test]
    fn depth_bound_stops_descent() {
        let mut deep = json!("secret");
        for _ in 0..10 {
            deep = json!({ "n": deep });
        }
        let p = params(json!({ "root": deep }));
        assert!(scan(&p, 5).is_empty());
        assert_eq!(scan(&p, 32).len(), 1);
    }
}
