//! Node-type and parameter predicates shared by the catalog.
//!
//! Type predicates take the lowercased type string from `RuleContext`.

use serde_json::Value;

use super::RuleContext;
use crate::parse::types::Node;

pub const LLM_MARKERS: &[&str] = &[
    "openai",
    "anthropic",
    "lmchat",
    "llm",
    "ollama",
    "gemini",
    "mistral",
    "cohere",
    "huggingface",
    "groq",
];

pub const CHAT_MODEL_MARKERS: &[&str] = &["lmchat", "chatmodel", "chatopenai", "chatanthropic"];

pub const SOCIAL_MARKERS: &[&str] = &[
    "twitter",
    "facebook",
    "linkedin",
    "instagram",
    "reddit",
    "tiktok",
    "mastodon",
    "pinterest",
    "youtube",
];

pub const DATABASE_MARKERS: &[&str] = &[
    "postgres",
    "mysql",
    "mariadb",
    "mssql",
    "microsoftsql",
    "sqlite",
    "oracle",
    "snowflake",
    "cockroach",
];

/// Matched by equality, not substring.
pub const CODE_EXECUTION_TYPES: &[&str] = &[
    "n8n-nodes-base.code",
    "n8n-nodes-base.function",
    "n8n-nodes-base.functionItem",
];

pub const HTTP_REQUEST_TYPE: &str = "n8n-nodes-base.httpRequest";

pub const PROMPT_KEYS: &[&str] = &[
    "prompt",
    "text",
    "message",
    "messages",
    "systemMessage",
    "input",
    "query",
];

pub const MAX_TOKEN_KEYS: &[&str] = &["maxTokens", "max_tokens", "maxTokensToSample", "maxOutputTokens"];

pub fn is_llm(ctx: &RuleContext<'_>) -> bool {
    ctx.type_has_any(LLM_MARKERS)
}

/// LLM or chat integration; chat triggers only receive input and are excluded.
pub fn is_llm_or_chat(ctx: &RuleContext<'_>) -> bool {
    is_llm(ctx) || (ctx.type_has("chat") && !ctx.type_has("chattrigger"))
}

pub fn is_chat_model(ctx: &RuleContext<'_>) -> bool {
    ctx.type_has_any(CHAT_MODEL_MARKERS) || (ctx.type_has("chat") && is_llm(ctx))
}

pub fn is_agent(ctx: &RuleContext<'_>) -> bool {
    ctx.type_has("agent")
}

pub fn is_code_execution(node: &Node) -> bool {
    CODE_EXECUTION_TYPES.contains(&node.node_type())
}

pub fn is_http_request(node: &Node) -> bool {
    node.node_type() == HTTP_REQUEST_TYPE
}

/// Looks a key up at the top level of `parameters`, then under `options`.
pub fn setting<'a>(node: &'a Node, key: &str) -> Option<&'a Value> {
    node.parameter(key).or_else(|| {
        node.parameter("options")
            .and_then(|o| o.get(key))
            .filter(|v| !v.is_null())
    })
}

pub fn has_any_setting(node: &Node, keys: &[&str]) -> bool {
    keys.iter().any(|k| setting(node, k).is_some())
}

/// First prompt-like parameter holding a template interpolation.
pub fn interpolated_prompt(node: &Node) -> Option<&'static str> {
    PROMPT_KEYS.iter().copied().find(|key| {
        setting(node, key)
            .and_then(Value::as_str)
            .is_some_and(|s| s.contains("{{"))
    })
}

/// Length of the `tools` parameter, when it is a list.
pub fn tool_count(node: &Node) -> Option<usize> {
    node.parameter("tools").and_then(Value::as_array).map(Vec::len)
}
