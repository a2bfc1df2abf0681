//! Audit Event Logger
//!
//! A hook that writes every audited event to the `audit_events` tracing
//! target, so it lands in the NDJSON log next to everything else.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sysaudit_core::{AuditHook, EventArgs, HookFailure};
use tracing::info;

use crate::redact::redact_value;

/// Tracing target used for audit event lines.
pub const EVENT_TARGET: &str = "audit_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventLogEntry {
    pub event: String,
    pub args: Value,
    pub timestamp: DateTime<Utc>,
}

/// Logs each event it sees. Never rejects an event.
#[derive(Debug, Clone)]
pub struct EventLogHook {
    redact: bool,
}

impl EventLogHook {
    pub fn new(redact: bool) -> Self {
        Self { redact }
    }

    pub fn entry(&self, event: &str, args: &EventArgs) -> EventLogEntry {
        let args = serde_json::to_value(args).unwrap_or_else(|e| {
            Value::String(format!("<unserializable arguments: {e}>"))
        });
        EventLogEntry {
            event: event.to_string(),
            args: if self.redact { redact_value(args) } else { args },
            timestamp: Utc::now(),
        }
    }
}

impl Default for EventLogHook {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AuditHook for EventLogHook {
    fn name(&self) -> &str {
        "event_log_hook"
    }

    fn call(&self, event: &str, args: &EventArgs) -> Result<(), HookFailure> {
        let entry = self.entry(event, args);
        info!(
            target: EVENT_TARGET,
            event = %entry.event,
            args = %entry.args,
            timestamp = %entry.timestamp.to_rfc3339(),
            "Audit event"
        );
        Ok(())
    }
}
