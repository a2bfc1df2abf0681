use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::AuditError;
use crate::value::AuditValue;

/// Immutable, shareable argument list of one audited event.
///
/// Built fresh for every notification. Cloning shares the same allocation.
#[derive(Clone, PartialEq)]
pub struct EventArgs(Arc<[AuditValue]>);

impl EventArgs {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// Copy `values` into a new argument list, reporting allocation failure
    /// instead of aborting.
    pub fn try_from_slice(values: &[AuditValue]) -> Result<Self, AuditError> {
        let mut owned = Vec::new();
        owned
            .try_reserve_exact(values.len())
            .map_err(|source| AuditError::Allocation {
                what: "event arguments",
                source,
            })?;
        owned.extend_from_slice(values);
        Ok(Self(owned.into()))
    }

    pub fn as_slice(&self) -> &[AuditValue] {
        &self.0
    }
}

impl Default for EventArgs {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for EventArgs {
    type Target = [AuditValue];

    fn deref(&self) -> &[AuditValue] {
        &self.0
    }
}

impl From<Vec<AuditValue>> for EventArgs {
    fn from(values: Vec<AuditValue>) -> Self {
        Self(values.into())
    }
}

impl std::fmt::Debug for EventArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl Serialize for EventArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_ref().serialize(serializer)
    }
}

/// An owned snapshot of one notification: event name plus its arguments.
///
/// The dispatch path never builds one; it exists for hooks that keep what
/// they observe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    pub name: String,
    pub args: EventArgs,
}

impl AuditEvent {
    pub fn new(name: impl Into<String>, args: EventArgs) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}
