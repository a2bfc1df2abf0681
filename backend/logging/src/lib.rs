//! Structured logging for sysaudit.
//!
//! Handles subscriber setup, log redaction, and the event-log hook that
//! mirrors audited events into the log stream.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogHook, EVENT_TARGET};
pub use logger::{init_logger, LOG_FILE_PREFIX};
pub use redact::{redact_sensitive_data, redact_value};
