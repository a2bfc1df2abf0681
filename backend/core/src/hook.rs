use std::fmt;
use std::sync::Arc;

use crate::error::HookFailure;
use crate::event::EventArgs;

/// An observer notified of every audited event.
///
/// Hooks run synchronously in the thread that reported the event. Returning
/// `Err` halts dispatch for the current event: hooks registered after this
/// one are not invoked.
pub trait AuditHook: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str {
        "anonymous"
    }

    fn call(&self, event: &str, args: &EventArgs) -> Result<(), HookFailure>;
}

/// Adapter turning a closure into a named [`AuditHook`].
pub struct FnHook<F> {
    name: String,
    f: F,
}

impl<F> FnHook<F>
where
    F: Fn(&str, &EventArgs) -> Result<(), HookFailure> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> AuditHook for FnHook<F>
where
    F: Fn(&str, &EventArgs) -> Result<(), HookFailure> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, event: &str, args: &EventArgs) -> Result<(), HookFailure> {
        (self.f)(event, args)
    }
}

impl<F> fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHook").field("name", &self.name).finish()
    }
}

/// Build a shareable hook from a closure.
pub fn hook_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn AuditHook>
where
    F: Fn(&str, &EventArgs) -> Result<(), HookFailure> + Send + Sync + 'static,
{
    Arc::new(FnHook::new(name, f))
}
