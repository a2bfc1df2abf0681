use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported to callers of `audit` and `addaudithook`.
///
/// Validation errors are raised before any hook runs. A hook that fails during
/// dispatch only surfaces as [`AuditError::HookFailed`] when the auditor runs
/// with the propagating failure policy.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A required positional argument was omitted.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// An argument had the wrong type. `actual` is the observed type name.
    #[error("expected {expected} for argument '{argument}', not {actual}")]
    InvalidType {
        argument: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// Growing the registry or building the per-call argument list failed.
    #[error("failed to allocate {what}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("hook '{hook}' failed while handling '{event}': {source}")]
    HookFailed {
        event: String,
        hook: String,
        #[source]
        source: HookFailure,
    },

    #[error("span '{0}' ended before it was started")]
    SpanNotStarted(String),
}

impl AuditError {
    pub fn invalid_type(argument: &'static str, expected: &'static str, actual: &str) -> Self {
        Self::InvalidType {
            argument,
            expected,
            actual: actual.to_string(),
        }
    }

    /// True for the errors raised before dispatch starts.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingArgument(_) | Self::InvalidType { .. })
    }
}

/// Failure signaled by a single hook invocation.
///
/// Any failure halts the remaining dispatch for that event.
#[derive(Debug, Error)]
pub enum HookFailure {
    /// The hook refused the audited operation.
    #[error("{0}")]
    Rejected(String),

    /// A registered value turned out not to be a hook.
    #[error("'{type_name}' object is not callable")]
    NotCallable { type_name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookFailure {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}
