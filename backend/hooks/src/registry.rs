//! Append-only hook registry.
//!
//! Entries are kept as opaque [`AuditValue`]s in registration order. Nothing
//! checks that an entry is callable; a non-hook entry only fails when a
//! dispatch reaches it. The lock is held only to append or to copy the
//! sequence, never while a hook runs, so hooks may re-enter the registry.
use std::sync::{Arc, PoisonError, RwLock};

use sysaudit_core::{AuditError, AuditValue};
use tracing::debug;

#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: Arc<RwLock<Vec<AuditValue>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. On allocation failure the registry is unchanged.
    pub fn append(&self, hook: AuditValue) -> Result<(), AuditError> {
        // A panic can only poison the lock between reserve and push, which
        // leaves the sequence intact.
        let mut hooks = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
        hooks.try_reserve(1).map_err(|source| AuditError::Allocation {
            what: "hook registry slot",
            source,
        })?;
        debug!(
            "[Registry] Appending {} at position {}",
            hook.type_name(),
            hooks.len()
        );
        hooks.push(hook);
        Ok(())
    }

    /// Copy of the entries as they are right now, in registration order.
    pub fn snapshot(&self) -> Result<Vec<AuditValue>, AuditError> {
        let hooks = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
        let mut copy = Vec::new();
        copy.try_reserve_exact(hooks.len())
            .map_err(|source| AuditError::Allocation {
                what: "hook snapshot",
                source,
            })?;
        copy.extend(hooks.iter().cloned());
        Ok(copy)
    }

    pub fn len(&self) -> usize {
        self.hooks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hook_count", &self.len())
            .finish()
    }
}
