//! Hook registry and dispatch for the sysaudit auditing facility.
//!
//! An [`Auditor`] owns an append-only registry of hooks. `audit` fans an event
//! out to every hook in registration order, in the calling thread, and stops
//! at the first hook that fails. By default that failure is logged and not
//! reported to the caller; see [`FailurePolicy`].

pub mod auditor;
pub mod builtin;
pub mod instrument;
pub mod matcher;
pub mod registry;
pub mod span;

pub use auditor::Auditor;
pub use builtin::{filtered, DenyEventsHook, EventFilterHook, RecordingHook, TracingHook};
pub use instrument::{audited_call, AuditScope};
pub use matcher::EventMatcher;
pub use registry::HookRegistry;
pub use span::{Span, SpanMessage, SpanMessageKind};
pub use sysaudit_core::{
    hook_fn, AuditError, AuditEvent, AuditHook, AuditValue, AuditorOptions, EventArgs,
    FailurePolicy, HookFailure, REGISTRATION_EVENT,
};

/// Audit an event with arguments converted through `AuditValue::from`.
///
/// ```
/// use sysaudit_hooks::{audit, Auditor};
///
/// let auditor = Auditor::new();
/// audit!(auditor, "socket.connect", "10.0.0.1", 443).unwrap();
/// ```
#[macro_export]
macro_rules! audit {
    ($auditor:expr, $event:expr $(, $arg:expr)* $(,)?) => {
        $auditor.audit_event($event, &[$($crate::AuditValue::from($arg)),*])
    };
}
