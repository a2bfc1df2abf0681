//! sysaudit configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every field is optional in the
//! file; [`crate::defaults`] fills in the gaps after loading.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use sysaudit_core::{AuditorOptions, FailurePolicy};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SysauditConfig {
    /// Dispatch behavior of the process auditor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<DispatchConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchConfig {
    /// "swallow" | "propagate"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<String>,

    /// Announce `sys.addaudithook` to existing hooks before registering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announce_registration: Option<bool>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. "info" or "sysaudit_hooks=debug,warn"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Emit console logs as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,

    /// Directory for rolling NDJSON log files; no file output when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Register the event-log hook at bootstrap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_events: Option<bool>,

    /// Redact secrets in logged event arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redact: Option<bool>,
}

impl SysauditConfig {
    /// Auditor options described by this config.
    pub fn auditor_options(&self) -> Result<AuditorOptions> {
        let dispatch = self.dispatch.clone().unwrap_or_default();
        let failure_policy = match dispatch.failure_policy.as_deref() {
            Some(raw) => raw.parse::<FailurePolicy>().map_err(|e| anyhow!(e))?,
            None => FailurePolicy::default(),
        };
        Ok(AuditorOptions {
            failure_policy,
            announce_registration: dispatch.announce_registration.unwrap_or(false),
        })
    }

    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
dispatch:
  failurePolicy: propagate
  announceRegistration: true
logging:
  level: debug
  logEvents: true
"#;
        let cfg: SysauditConfig = serde_yaml::from_str(yaml).unwrap();
        let opts = cfg.auditor_options().unwrap();
        assert_eq!(opts.failure_policy, FailurePolicy::Propagate);
        assert!(opts.announce_registration);
        assert_eq!(cfg.logging().level.as_deref(), Some("debug"));
        assert_eq!(cfg.logging().log_events, Some(true));
    }

    #[test]
    fn empty_config_gives_default_options() {
        let cfg = SysauditConfig::default();
        assert_eq!(cfg.auditor_options().unwrap(), AuditorOptions::default());
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let cfg = SysauditConfig {
            dispatch: Some(DispatchConfig {
                failure_policy: Some("explode".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = cfg.auditor_options().unwrap_err();
        assert!(err.to_string().contains("explode"));
    }
}
