use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Event reported to existing hooks before a new hook is added, when
/// registration announcements are enabled.
pub const REGISTRATION_EVENT: &str = "sys.addaudithook";

/// What `audit` reports to its caller when a hook fails mid-dispatch.
///
/// In both modes dispatch stops at the failing hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The failure is logged and `audit` still returns `Ok(())`.
    #[default]
    Swallow,
    /// `audit` returns `AuditError::HookFailed`.
    Propagate,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Swallow => write!(f, "swallow"),
            FailurePolicy::Propagate => write!(f, "propagate"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "swallow" => Ok(Self::Swallow),
            "propagate" => Ok(Self::Propagate),
            other => Err(format!(
                "unknown failure policy '{other}' (expected 'swallow' or 'propagate')"
            )),
        }
    }
}

/// Behavioral switches of an auditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditorOptions {
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Dispatch [`REGISTRATION_EVENT`] before adding a hook; a failing
    /// existing hook silently vetoes the addition.
    #[serde(default)]
    pub announce_registration: bool,
}
