//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens, and credential assignments from strings
//! before they reach a log sink.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
static CREDENTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(password|passwd|secret|token|api[_-]?key)\s*[=:]\s*[^\s&;,]+").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    CREDENTIAL_RE
        .replace_all(&redacted, "$1=[REDACTED]")
        .into_owned()
}

/// Redacts every string (but not object keys) inside a JSON tree.
pub fn redact_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(redact_sensitive_data(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(redact_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, redact_value(v)))
                .collect(),
        ),
        other => other,
    }
}
