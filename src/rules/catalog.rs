//! The fixed rule catalog (R01–R18).
//! Order here is the order findings appear in for a node.

use serde_json::Value;

use super::matchers::*;
use super::sensitive;
use super::{Detection, Rule, RuleContext};
use crate::report::Severity;

pub static CATALOG: &[Rule] = &[
    Rule {
        code: "R01",
        category: "Prompt Injection",
        severity: Severity::High,
        description: "Dynamic data is interpolated into an LLM prompt. Crafted input can override the model's instructions.",
        remediation: &[
            "Validate and sanitize user-supplied text before it reaches the prompt",
            "Keep system instructions separate from user content",
            "Constrain the model's output format and check it downstream",
        ],
        detect: r01_prompt_injection,
    },
    Rule {
        code: "R02",
        category: "Insecure Output Handling",
        severity: Severity::Medium,
        description: "LLM output is passed on to later steps. Unchecked output can carry injected markup, commands or data.",
        remediation: &[
            "Treat model output as untrusted input",
            "Validate or encode output before using it in HTML, SQL, shell or API calls",
        ],
        detect: r02_insecure_output,
    },
    Rule {
        code: "R03",
        category: "Training Data Poisoning",
        severity: Severity::High,
        description: "The node references training data or a dataset. Tampered data can bias or backdoor a model.",
        remediation: &[
            "Verify the provenance and integrity of training data",
            "Restrict who can modify the dataset source",
        ],
        detect: r03_training_data,
    },
    Rule {
        code: "R04",
        category: "Model Denial of Service",
        severity: Severity::Medium,
        description: "The LLM call has neither a token limit nor a timeout. Large or adversarial inputs can exhaust quota and stall the workflow.",
        remediation: &[
            "Set a maximum token count for the model response",
            "Configure a request timeout",
            "Rate-limit the trigger that feeds this node",
        ],
        detect: r04_model_dos,
    },
    Rule {
        code: "R05",
        category: "Sensitive Information Disclosure",
        severity: Severity::High,
        description: "A parameter value looks like it contains a credential or personal data. Values in workflow exports are stored and shared in plain text.",
        remediation: &[
            "Move secrets into the credential store and reference them instead",
            "Remove personal data from static parameters",
            "Rotate any secret that has been exported",
        ],
        detect: r05_sensitive_data,
    },
    Rule {
        code: "R06",
        category: "Insecure Plugin Design",
        severity: Severity::Medium,
        description: "Tools and agents act on behalf of the model with limited input validation.",
        remediation: &[
            "Validate tool inputs with a strict schema",
            "Grant each tool the minimum permissions it needs",
        ],
        detect: r06_insecure_plugin,
    },
    Rule {
        code: "R07",
        category: "Excessive Agency",
        severity: Severity::High,
        description: "The agent has access to a large number of tools, widening what a manipulated model can do.",
        remediation: &[
            "Reduce the tool set to what the task requires",
            "Require human approval for destructive actions",
        ],
        detect: r07_excessive_agency,
    },
    Rule {
        code: "R08",
        category: "Overreliance",
        severity: Severity::Medium,
        description: "Chat model output is used without a fallback or validation step.",
        remediation: &[
            "Add a validation step for model responses",
            "Configure a fallback path for low-confidence or failed responses",
        ],
        detect: r08_overreliance,
    },
    Rule {
        code: "R09",
        category: "Model Theft",
        severity: Severity::Medium,
        description: "The node references a model file or URL that could be exfiltrated or swapped.",
        remediation: &[
            "Store model artifacts behind access control",
            "Verify model checksums before loading",
        ],
        detect: r09_model_theft,
    },
    Rule {
        code: "R10",
        category: "Insecure Planning",
        severity: Severity::Medium,
        description: "Agents plan and execute multi-step actions autonomously. A manipulated plan can chain harmful steps.",
        remediation: &[
            "Limit the number of iterations an agent may run",
            "Log and review agent plans",
        ],
        detect: r10_insecure_planning,
    },
    Rule {
        code: "R11",
        category: "Memory Poisoning",
        severity: Severity::Medium,
        description: "Conversation memory persists across turns. Injected content can influence later responses.",
        remediation: &[
            "Scope memory to a single session or user",
            "Limit memory window size and clear it regularly",
        ],
        detect: r11_memory_poisoning,
    },
    Rule {
        code: "R12",
        category: "Credential Reference",
        severity: Severity::Low,
        description: "The node uses a stored credential. This is the recommended pattern; review that the credential has minimal scope.",
        remediation: &[
            "Confirm the credential grants only the permissions this node needs",
            "Rotate credentials periodically",
        ],
        detect: r12_credential_reference,
    },
    Rule {
        code: "R13",
        category: "Code Execution Risk",
        severity: Severity::High,
        description: "The node runs custom code inside the workflow engine.",
        remediation: &[
            "Review the code for unsafe operations and injected input",
            "Prefer built-in nodes over custom code where possible",
            "Restrict who can edit this workflow",
        ],
        detect: r13_code_execution,
    },
    Rule {
        code: "R14",
        category: "External HTTP Request",
        severity: Severity::Medium,
        description: "The node sends requests to an external endpoint. Plain HTTP exposes data in transit.",
        remediation: &[
            "Use HTTPS for all external requests",
            "Verify the endpoint is trusted",
            "Avoid sending sensitive data in URLs",
        ],
        detect: r14_external_http,
    },
    Rule {
        code: "R15",
        category: "Webhook Exposure",
        severity: Severity::Medium,
        description: "The node exposes an externally reachable endpoint that anyone with the URL can call.",
        remediation: &[
            "Enable authentication on the webhook",
            "Validate incoming payloads",
            "Rate-limit the endpoint",
        ],
        detect: r15_webhook_exposure,
    },
    Rule {
        code: "R16",
        category: "Social Media Integration Risk",
        severity: Severity::Medium,
        description: "The node can publish to or read from a social platform, where mistakes are public.",
        remediation: &[
            "Review content before it is posted",
            "Use accounts with the narrowest posting permissions",
        ],
        detect: r16_social_media,
    },
    Rule {
        code: "R17",
        category: "Database Security Risk",
        severity: Severity::High,
        description: "The node queries a relational database. Interpolated queries are open to SQL injection.",
        remediation: &[
            "Use parameterized queries",
            "Connect with a least-privilege database user",
        ],
        detect: r17_database,
    },
    Rule {
        code: "R18",
        category: "File System Access Risk",
        severity: Severity::Medium,
        description: "The node reads or writes files on the host or a remote file store.",
        remediation: &[
            "Restrict file paths to a dedicated directory",
            "Never build paths from untrusted input",
        ],
        detect: r18_file_system,
    },
];

fn hit_if(condition: bool, message: impl FnOnce() -> String) -> Vec<Detection> {
    if condition {
        vec![Detection::new(message())]
    } else {
        vec![]
    }
}

fn r01_prompt_injection(ctx: &RuleContext<'_>) -> Vec<Detection> {
    if !is_llm_or_chat(ctx) {
        return vec![];
    }
    match interpolated_prompt(ctx.node) {
        Some(key) => vec![Detection::new(format!(
            "Parameter '{}' interpolates dynamic data into the prompt",
            key
        ))],
        None => vec![],
    }
}

fn r02_insecure_output(ctx: &RuleContext<'_>) -> Vec<Detection> {
    hit_if(is_llm_or_chat(ctx), || {
        "LLM output is used by downstream steps".into()
    })
}

fn r03_training_data(ctx: &RuleContext<'_>) -> Vec<Detection> {
    let key = ["trainingData", "dataset"]
        .into_iter()
        .find(|k| ctx.node.parameter(k).is_some());
    match key {
        Some(key) => vec![Detection::new(format!("Node references '{}'", key))],
        None => vec![],
    }
}

fn r04_model_dos(ctx: &RuleContext<'_>) -> Vec<Detection> {
    hit_if(
        is_llm(ctx)
            && !has_any_setting(ctx.node, MAX_TOKEN_KEYS)
            && !has_any_setting(ctx.node, &["timeout"]),
        || "LLM call has no token limit or timeout".into(),
    )
}

fn r05_sensitive_data(ctx: &RuleContext<'_>) -> Vec<Detection> {
    sensitive::scan(&ctx.node.parameters, ctx.config.max_scan_depth)
        .into_iter()
        .map(|m| Detection::new(format!("Possible {} in parameter '{}'", m.label, m.path)))
        .collect()
}

fn r06_insecure_plugin(ctx: &RuleContext<'_>) -> Vec<Detection> {
    hit_if(ctx.type_has_any(&["tool", "agent"]), || {
        "Tool or agent integration acts on model decisions".into()
    })
}

fn r07_excessive_agency(ctx: &RuleContext<'_>) -> Vec<Detection> {
    let tools = tool_count(ctx.node);
    if !is_agent(ctx) && tools.is_none() {
        return vec![];
    }
    let count = tools.unwrap_or(0);
    hit_if(count > ctx.config.max_agent_tools, || {
        format!(
            "Agent has {} tools (more than {})",
            count, ctx.config.max_agent_tools
        )
    })
}

fn r08_overreliance(ctx: &RuleContext<'_>) -> Vec<Detection> {
    hit_if(
        is_chat_model(ctx) && !has_any_setting(ctx.node, &["fallback", "validation"]),
        || "Chat model response is used without fallback or validation".into(),
    )
}

fn r09_model_theft(ctx: &RuleContext<'_>) -> Vec<Detection> {
    let found = ["modelPath", "modelUrl"]
        .into_iter()
        .find(|k| ctx.node.parameter(k).is_some());
    match found {
        Some(key) => vec![Detection::new(format!("Node exposes model location via '{}'", key))],
        None => vec![],
    }
}

fn r10_insecure_planning(ctx: &RuleContext<'_>) -> Vec<Detection> {
    hit_if(ctx.type_has_any(&["agent", "planner", "planning"]), || {
        "Agent plans and executes actions autonomously".into()
    })
}

fn r11_memory_poisoning(ctx: &RuleContext<'_>) -> Vec<Detection> {
    hit_if(ctx.type_has_any(&["memory", "buffer"]), || {
        "Node persists conversation memory".into()
    })
}

fn r12_credential_reference(ctx: &RuleContext<'_>) -> Vec<Detection> {
    if !ctx.config.include_credential_advisories {
        return vec![];
    }
    let Some(credentials) = &ctx.node.credentials else {
        return vec![];
    };
    credentials
        .iter()
        .filter(|(_, reference)| {
            reference.get("id").is_some_and(|id| match id {
                Value::String(s) => !s.is_empty(),
                Value::Number(_) => true,
                _ => false,
            })
        })
        .map(|(credential_type, reference)| {
            let name = reference
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(credential_type.as_str());
            Detection::new(format!(
                "Uses stored credential '{}' ({})",
                name, credential_type
            ))
        })
        .collect()
}

fn r13_code_execution(ctx: &RuleContext<'_>) -> Vec<Detection> {
    hit_if(is_code_execution(ctx.node), || {
        format!("Node type '{}' executes custom code", ctx.node.node_type())
    })
}

fn r14_external_http(ctx: &RuleContext<'_>) -> Vec<Detection> {
    if !is_http_request(ctx.node) {
        return vec![];
    }
    let Some(url) = ctx.node.parameter_str("url") else {
        return vec![];
    };
    let lower = url.trim_start_matches('=').trim_start().to_ascii_lowercase();
    if lower.starts_with("http://") {
        vec![Detection::with_severity(
            Severity::High,
            format!("Unencrypted HTTP request to {}", url),
        )]
    } else if lower.starts_with("https://") {
        vec![Detection::with_severity(
            Severity::Medium,
            format!("External HTTPS request to {}", url),
        )]
    } else {
        vec![]
    }
}

fn r15_webhook_exposure(ctx: &RuleContext<'_>) -> Vec<Detection> {
    let entry_point = ctx.type_has_any(&["trigger", "webhook", "form"]);
    hit_if(
        entry_point && (ctx.node.webhook_id.is_some() || ctx.type_has("webhook")),
        || "Node is reachable from outside the workflow engine".into(),
    )
}

fn r16_social_media(ctx: &RuleContext<'_>) -> Vec<Detection> {
    let platform = SOCIAL_MARKERS.iter().find(|m| ctx.type_has(m));
    match platform {
        Some(platform) => vec![Detection::new(format!("Node integrates with {}", platform))],
        None => vec![],
    }
}

fn r17_database(ctx: &RuleContext<'_>) -> Vec<Detection> {
    hit_if(ctx.type_has_any(DATABASE_MARKERS), || {
        "Node runs queries against a relational database".into()
    })
}

fn r18_file_system(ctx: &RuleContext<'_>) -> Vec<Detection> {
    hit_if(ctx.type_has_any(&["file", "filesystem"]), || {
        "Node reads or writes files".into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::parse::types::Node;
    use serde_json::json;

    fn detect(code: &str, value: serde_json::Value) -> Vec<Detection> {
        let node = Node::from_value(&value);
        let config = AnalyzerConfig::default();
        let ctx = RuleContext::new(&node, &config);
        let rule = CATALOG.iter().find(|r| r.code == code).unwrap();
        (rule.detect)(&ctx)
    }

    #[test]
    fn r03_dataset_parameter() {
        assert_eq!(detect("R03", json!({ "parameters": { "dataset": "s3://x" } })).len(), 1);
        assert!(detect("R03", json!({ "parameters": { "dataset": null } })).is_empty());
    }

    #[test]
    fn r04_token_limit_suppresses() {
        let t = "@n8n/n8n-nodes-langchain.lmChatOpenAi";
        assert_eq!(detect("R04", json!({ "type": t })).len(), 1);
        assert!(detect("R04", json!({ "type": t, "parameters": { "options": { "maxTokens": 100 } } })).is_empty());
        assert!(detect("R04", json!({ "type": t, "parameters": { "timeout": 30 } })).is_empty());
    }

    #[test]
    fn r07_tool_limit() {
        let tools = |n: usize| json!({ "type": "x.agent", "parameters": { "tools": vec![json!({}); n] } });
        assert!(detect("R07", tools(5)).is_empty());
        assert_eq!(detect("R07", tools(6)).len(), 1);
        assert!(detect("R07", json!({ "type": "x.agent" })).is_empty());
        assert_eq!(
            detect("R07", json!({ "type": "x.set", "parameters": { "tools": vec![json!(1); 7] } })).len(),
            1
        );
    }

    #[test]
    fn r08_fallback_suppresses() {
        let t = "@n8n/n8n-nodes-langchain.lmChatAnthropic";
        assert_eq!(detect("R08", json!({ "type": t })).len(), 1);
        assert!(detect("R08", json!({ "type": t, "parameters": { "fallback": true } })).is_empty());
    }

    #[test]
    fn r12_one_per_resolved_credential() {
        let d = detect(
            "R12",
            json!({ "credentials": {
                "openAiApi": { "id": "abc", "name": "OpenAI account" },
                "httpBasicAuth": { "name": "unset" },
                "slackApi": { "id": "" }
            }}),
        );
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].message, "Uses stored credential 'OpenAI account' (openAiApi)");
    }

    #[test]
    fn r14_severity_by_scheme() {
        let http = |url: &str| json!({ "type": HTTP_REQUEST_TYPE, "parameters": { "url": url } });
        assert_eq!(detect("R14", http("http://a.test"))[0].severity, Some(Severity::High));
        assert_eq!(detect("R14", http("HTTPS://a.test"))[0].severity, Some(Severity::Medium));
        assert!(detect("R14", http("={{ $json.url }}")).is_empty());
        assert_eq!(detect("R14", http("=http://a.test"))[0].severity, Some(Severity::High));
        assert_eq!(
            detect("R14", http("https://a.test/?next=http://b.test"))[0].severity,
            Some(Severity::Medium)
        );
        assert!(detect(
            "R14",
            json!({ "type": "custom.httpRequestV2", "parameters": { "url": "http://a.test" } })
        )
        .is_empty());
    }

    #[test]
    fn r15_requires_webhook_id_or_webhook_type() {
        assert_eq!(detect("R15", json!({ "type": "n8n-nodes-base.webhook" })).len(), 1);
        assert!(detect("R15", json!({ "type": "n8n-nodes-base.scheduleTrigger" })).is_empty());
        assert_eq!(
            detect("R15", json!({ "type": "n8n-nodes-base.formTrigger", "webhookId": "w-1" })).len(),
            1
        );
    }

    #[test]
    fn r16_to_r18_type_markers() {
        assert_eq!(detect("R16", json!({ "type": "n8n-nodes-base.twitter" })).len(), 1);
        assert_eq!(detect("R17", json!({ "type": "n8n-nodes-base.postgres" })).len(), 1);
        assert_eq!(detect("R18", json!({ "type": "n8n-nodes-base.readWriteFile" })).len(), 1);
        assert!(detect("R17", json!({ "type": "n8n-nodes-base.set" })).is_empty());
    }
}
