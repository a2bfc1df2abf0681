//! Shared types for the sysaudit auditing facility: the dynamic value model
//! for event arguments, the hook trait, and the error taxonomy.

pub mod error;
pub mod event;
pub mod hook;
pub mod types;
pub mod value;

pub use error::{AuditError, HookFailure};
pub use event::{AuditEvent, EventArgs};
pub use hook::{hook_fn, AuditHook, FnHook};
pub use types::{AuditorOptions, FailurePolicy, REGISTRATION_EVENT};
pub use value::{AuditValue, Opaque};
