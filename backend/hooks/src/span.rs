//! Spans: paired start/end audit events with optional annotations.
//!
//! Every span message is audited under the span's own name with a single
//! opaque [`SpanMessage`] argument, so hooks can correlate start, annotate and
//! end through the span id.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sysaudit_core::{AuditError, AuditValue};
use tracing::debug;
use uuid::Uuid;

use crate::auditor::Auditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanMessageKind {
    Start,
    Annotate,
    End,
}

/// Payload of one span event. Recover it with
/// `args[0].downcast_ref::<SpanMessage>()`.
#[derive(Debug, Clone, Serialize)]
pub struct SpanMessage {
    pub kind: SpanMessageKind,
    pub span_id: Uuid,
    pub span_name: String,
    pub data: AuditValue,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Span {
    auditor: Auditor,
    name: String,
    id: Uuid,
    data: AuditValue,
    started: bool,
    ended: bool,
}

impl Span {
    pub fn new(auditor: &Auditor, name: impl Into<String>, data: AuditValue) -> Self {
        Self {
            auditor: auditor.clone(),
            name: name.into(),
            id: Uuid::new_v4(),
            data,
            started: false,
            ended: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Data attached at construction.
    pub fn data(&self) -> &AuditValue {
        &self.data
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Emit the start message. Only the first call has an effect.
    pub fn start(&mut self, data: AuditValue) -> Result<&mut Self, AuditError> {
        if !self.started {
            self.message(SpanMessageKind::Start, data)?;
            self.started = true;
        }
        Ok(self)
    }

    /// Emit the end message. Only the first call has an effect.
    pub fn end(&mut self, data: AuditValue) -> Result<(), AuditError> {
        if !self.started {
            return Err(AuditError::SpanNotStarted(self.name.clone()));
        }
        if !self.ended {
            self.message(SpanMessageKind::End, data)?;
            self.ended = true;
        }
        Ok(())
    }

    pub fn annotate(&self, data: AuditValue) -> Result<(), AuditError> {
        self.message(SpanMessageKind::Annotate, data)
    }

    /// Start a span, run `f` inside it, and end it with the outcome.
    ///
    /// The end message carries `None` on success and the error text on
    /// failure. Errors from the span's own audit calls are converted with
    /// `E: From<AuditError>`.
    pub fn run<T, E, F>(
        auditor: &Auditor,
        name: impl Into<String>,
        data: AuditValue,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut Span) -> Result<T, E>,
        E: From<AuditError> + std::fmt::Display,
    {
        let mut span = Span::new(auditor, name, data);
        span.start(AuditValue::None)?;
        let result = f(&mut span);
        let outcome = match &result {
            Ok(_) => AuditValue::None,
            Err(e) => AuditValue::from(e.to_string()),
        };
        span.end(outcome)?;
        result
    }

    fn message(&self, kind: SpanMessageKind, data: AuditValue) -> Result<(), AuditError> {
        debug!(span = %self.name, id = %self.id, ?kind, "[Span] Message");
        let message = SpanMessage {
            kind,
            span_id: self.id,
            span_name: self.name.clone(),
            data,
            timestamp: Utc::now(),
        };
        self.auditor
            .audit_event(&self.name, &[AuditValue::opaque(message)])
    }
}
