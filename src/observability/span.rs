//! Span lifecycle.
//!
//! # Lifecycle
//! ```text
//! Tracer::start_span ──▶ Created ──(set_attribute | set_status)*──▶ end() ──▶ Ended
//! ```
//! Every mutation after `end` returns [`TelemetryError::SpanEnded`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::SystemTime;
use uuid::Uuid;

use crate::observability::sink::EventSink;
use crate::observability::tracer::Clock;
use crate::observability::types::{
    AttributeValue, SpanKind, SpanRecord, SpanStatus, TelemetryError, TelemetryEvent,
    TelemetryResult,
};

/// A timed record of one logical operation.
///
/// Owned by the call that started it.
pub struct Span {
    id: Uuid,
    name: String,
    kind: SpanKind,
    attributes: BTreeMap<String, AttributeValue>,
    status: SpanStatus,
    status_description: Option<String>,
    started_at: SystemTime,
    ended: bool,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl Span {
    pub(crate) fn start(
        name: String,
        kind: SpanKind,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let span = Self {
            id: Uuid::new_v4(),
            name,
            kind,
            attributes: BTreeMap::new(),
            status: SpanStatus::Unset,
            status_description: None,
            started_at: clock.now(),
            ended: false,
            sink,
            clock,
        };

        span.sink.emit(TelemetryEvent::SpanStarted {
            span_id: span.id,
            name: span.name.clone(),
            kind: span.kind,
            started_at: span.started_at,
        });
        span
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SpanKind {
        self.kind
    }

    pub fn status(&self) -> SpanStatus {
        self.status
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Insert or replace an attribute.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> TelemetryResult<()> {
        self.ensure_open()?;
        self.attributes.insert(key.into(), value.into());
        Ok(())
    }

    /// Record the span status. The last call before `end` wins.
    ///
    /// An empty description is stored as none.
    pub fn set_status(
        &mut self,
        status: SpanStatus,
        description: impl Into<String>,
    ) -> TelemetryResult<()> {
        self.ensure_open()?;
        let description = description.into();
        self.status = status;
        self.status_description = (!description.is_empty()).then_some(description);
        Ok(())
    }

    /// Seal the span and emit its final record.
    pub fn end(&mut self) -> TelemetryResult<SpanRecord> {
        self.ensure_open()?;
        self.ended = true;

        let ended_at = self.clock.now();
        let record = SpanRecord {
            span_id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            attributes: self.attributes.clone(),
            status: self.status,
            status_description: self.status_description.clone(),
            started_at: self.started_at,
            ended_at,
            duration: ended_at.duration_since(self.started_at).unwrap_or_default(),
        };

        self.sink.emit(TelemetryEvent::SpanEnded(record.clone()));
        Ok(record)
    }

    fn ensure_open(&self) -> TelemetryResult<()> {
        if self.ended {
            return Err(TelemetryError::SpanEnded {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Span")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("ended", &self.ended)
            .finish()
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        if !self.ended {
            tracing::warn!(span = %self.name, span_id = %self.id, "Span dropped without end");
        }
    }
}
