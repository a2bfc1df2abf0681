//! Built-in hook implementations.
//!
//! Small building blocks for the common auditing setups: tracing every event,
//! restricting a hook to some event names, denying sensitive operations, and
//! keeping a record of what was observed.
use std::sync::{Arc, Mutex, PoisonError};

use sysaudit_core::{AuditEvent, AuditHook, EventArgs, HookFailure};
use tracing::debug;

use crate::matcher::EventMatcher;

// ---------------------------------------------------------------------------
// Tracing hook: logs every event
// ---------------------------------------------------------------------------

pub struct TracingHook {
    pub prefix: String,
}

impl TracingHook {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl AuditHook for TracingHook {
    fn name(&self) -> &str {
        "tracing_hook"
    }

    fn call(&self, event: &str, args: &EventArgs) -> Result<(), HookFailure> {
        debug!("[{}] Audit event {} ({} args)", self.prefix, event, args.len());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Event filter: forwards only matching events to the inner hook
// ---------------------------------------------------------------------------

/// Restricts a hook to events whose name matches one of the patterns.
///
/// Non-matching events complete normally without reaching the inner hook.
pub struct EventFilterHook {
    matcher: EventMatcher,
    inner: Arc<dyn AuditHook>,
}

impl EventFilterHook {
    pub fn new(matcher: EventMatcher, inner: Arc<dyn AuditHook>) -> Self {
        Self { matcher, inner }
    }
}

impl AuditHook for EventFilterHook {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn call(&self, event: &str, args: &EventArgs) -> Result<(), HookFailure> {
        if !self.matcher.is_match(event) {
            return Ok(());
        }
        self.inner.call(event, args)
    }
}

/// Wrap `hook` so it only sees events matching `patterns`.
pub fn filtered<I, S>(patterns: I, hook: Arc<dyn AuditHook>) -> Arc<dyn AuditHook>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(EventFilterHook::new(EventMatcher::new(patterns), hook))
}

// ---------------------------------------------------------------------------
// Deny hook: rejects sensitive operations
// ---------------------------------------------------------------------------

/// Fails for every event matching its patterns, halting dispatch.
pub struct DenyEventsHook {
    matcher: EventMatcher,
}

impl DenyEventsHook {
    pub fn new(matcher: EventMatcher) -> Self {
        Self { matcher }
    }
}

impl AuditHook for DenyEventsHook {
    fn name(&self) -> &str {
        "deny_events_hook"
    }

    fn call(&self, event: &str, _args: &EventArgs) -> Result<(), HookFailure> {
        if self.matcher.is_match(event) {
            return Err(HookFailure::rejected(format!(
                "event '{event}' is denied by policy"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Recording hook: keeps every observed event
// ---------------------------------------------------------------------------

/// Collects every observed event. Clones share one record.
#[derive(Clone, Default)]
pub struct RecordingHook {
    seen: Arc<Mutex<Vec<AuditEvent>>>,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl AuditHook for RecordingHook {
    fn name(&self) -> &str {
        "recording_hook"
    }

    fn call(&self, event: &str, args: &EventArgs) -> Result<(), HookFailure> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AuditEvent::new(event, args.clone()));
        Ok(())
    }
}
