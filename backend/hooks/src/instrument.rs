//! Started/finished event pairs around a call or a scope.
//!
//! For a prefix `p` the events are `p.started` (with the caller's arguments)
//! and `p.finished`. The finished event is emitted even when the wrapped work
//! fails.

use std::fmt::Display;

use sysaudit_core::{AuditError, AuditValue};
use tracing::warn;

use crate::auditor::Auditor;

fn started(prefix: &str) -> String {
    format!("{prefix}.started")
}

fn finished(prefix: &str) -> String {
    format!("{prefix}.finished")
}

/// Run `f` between `<prefix>.started` and `<prefix>.finished`.
///
/// `<prefix>.finished` carries `("ok", None)` or `("err", "<error text>")`.
/// The result of `f` is returned unchanged unless auditing the finished
/// event fails.
///
/// If auditing `<prefix>.started` fails, `f` is not run; `<prefix>.finished`
/// is still emitted with that error and the started error is returned.
pub fn audited_call<T, E, F>(
    auditor: &Auditor,
    prefix: &str,
    args: &[AuditValue],
    f: F,
) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<AuditError> + Display,
{
    if let Err(err) = auditor.audit_event(&started(prefix), args) {
        let outcome = [AuditValue::from("err"), AuditValue::from(err.to_string())];
        if let Err(e) = auditor.audit_event(&finished(prefix), &outcome) {
            warn!(prefix, error = %e, "[Audit] Finished event failed after start failure");
        }
        return Err(err.into());
    }
    let result = f();
    let outcome = match &result {
        Ok(_) => [AuditValue::from("ok"), AuditValue::None],
        Err(e) => [AuditValue::from("err"), AuditValue::from(e.to_string())],
    };
    auditor.audit_event(&finished(prefix), &outcome)?;
    result
}

/// Guard emitting `<prefix>.started` on entry and `<prefix>.finished` when
/// finished or dropped.
///
/// The finished event has one argument: `None`, the error text passed to
/// [`AuditScope::fail`], or `"panicked"` when dropped during unwinding.
#[must_use = "dropping the scope immediately emits the finished event"]
pub struct AuditScope {
    auditor: Auditor,
    prefix: String,
    done: bool,
}

impl AuditScope {
    pub fn enter(
        auditor: &Auditor,
        prefix: impl Into<String>,
        args: &[AuditValue],
    ) -> Result<Self, AuditError> {
        let prefix = prefix.into();
        auditor.audit_event(&started(&prefix), args)?;
        Ok(Self {
            auditor: auditor.clone(),
            prefix,
            done: false,
        })
    }

    /// Close the scope successfully.
    pub fn finish(mut self) -> Result<(), AuditError> {
        self.close(AuditValue::None)
    }

    /// Close the scope, reporting `error`.
    pub fn fail(mut self, error: &dyn Display) -> Result<(), AuditError> {
        self.close(AuditValue::from(error.to_string()))
    }

    fn close(&mut self, error: AuditValue) -> Result<(), AuditError> {
        self.done = true;
        self.auditor.audit_event(&finished(&self.prefix), &[error])
    }
}

impl Drop for AuditScope {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let error = if std::thread::panicking() {
            AuditValue::from("panicked")
        } else {
            AuditValue::None
        };
        if let Err(e) = self.close(error) {
            warn!(prefix = %self.prefix, error = %e, "[Audit] Finished event failed on drop");
        }
    }
}
