//! `sysaudit`: process-wide audit hooks.
//!
//! Code reports security-relevant events with [`audit()`]; observers register
//! hooks with [`addaudithook`]. Every hook sees every event, in registration
//! order, on the reporting thread. Hooks can never be removed.
//!
//! ```
//! use sysaudit::{addaudithook, audit, hook_fn, AuditValue};
//!
//! addaudithook(&[AuditValue::hook(hook_fn("print", |event, args| {
//!     println!("{event}: {args:?}");
//!     Ok(())
//! }))])
//! .unwrap();
//!
//! audit(&["os.remove".into(), "/tmp/scratch".into()]).unwrap();
//! ```
//!
//! Embedders that want isolation construct their own [`Auditor`] instead.

pub mod bootstrap;
pub mod global;

pub use bootstrap::Runtime;
pub use global::{install, process_auditor};
pub use sysaudit_hooks::*;

use std::sync::Arc;

/// Report an event to every hook of the process auditor.
///
/// `args[0]` is the event name (must be a string); the rest travel to the
/// hooks unchanged.
pub fn audit(args: &[AuditValue]) -> Result<(), AuditError> {
    process_auditor().audit(args)
}

/// Register `args[0]` as a hook on the process auditor.
pub fn addaudithook(args: &[AuditValue]) -> Result<(), AuditError> {
    process_auditor().addaudithook(args)
}

/// Register a typed hook on the process auditor.
pub fn register(hook: Arc<dyn AuditHook>) -> Result<(), AuditError> {
    process_auditor().register(hook)
}
