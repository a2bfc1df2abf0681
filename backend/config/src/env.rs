//! Environment handling for config values.
//!
//! - `${VAR_NAME}` in string values is replaced at load time; only uppercase
//!   `[A-Z_][A-Z0-9_]*` names are recognized, and `$${VAR}` stays a literal
//!   `${VAR}`.
//! - `SYSAUDIT_*` variables override individual settings after the file is read.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{DispatchConfig, LoggingConfig, SysauditConfig};

/// Overrides `dispatch.failurePolicy`.
pub const ENV_FAILURE_POLICY: &str = "SYSAUDIT_FAILURE_POLICY";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "SYSAUDIT_LOG_LEVEL";
/// Overrides `logging.logEvents` ("1"/"true"/"yes" enable it).
pub const ENV_LOG_EVENTS: &str = "SYSAUDIT_LOG_EVENTS";

/// One optional leading `$` (the escape) followed by `${NAME}`.
static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment. Variables whose name or value is
/// not valid UTF-8 are skipped.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Substitute `${VAR}` references using the process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &process_env())
}

/// Substitute `${VAR}` references from `env`. Unset or empty variables are
/// an error naming the config path.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    walk(value, env, "").map_err(Into::into)
}

fn walk(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    Ok(match value {
        Value::String(s) => Value::String(substitute(s, env, path)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| walk(v, env, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                out.insert(k.clone(), walk(v, env, &child)?);
            }
            Value::Object(out)
        }
        other => other.clone(),
    })
}

fn substitute(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }
    let mut missing = None;
    let replaced = REFERENCE.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(v) if !v.is_empty() => v.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });
    match missing {
        Some(err) => Err(err),
        None => Ok(replaced.into_owned()),
    }
}

/// Apply `SYSAUDIT_*` overrides from `env` on top of a loaded config.
pub fn apply_env_overrides(
    mut config: SysauditConfig,
    env: &HashMap<String, String>,
) -> SysauditConfig {
    if let Some(policy) = env.get(ENV_FAILURE_POLICY).filter(|v| !v.is_empty()) {
        config
            .dispatch
            .get_or_insert_with(DispatchConfig::default)
            .failure_policy = Some(policy.clone());
    }
    if let Some(level) = env.get(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.clone());
    }
    if let Some(flag) = env.get(ENV_LOG_EVENTS).filter(|v| !v.is_empty()) {
        let enabled = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        config.logging.get_or_insert_with(LoggingConfig::default).log_events = Some(enabled);
    }
    config
}
