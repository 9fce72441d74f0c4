//! Consumers of telemetry events.

use std::sync::Mutex;

use crate::observability::types::{LogRecord, Severity, SpanRecord, TelemetryEvent};

/// Receives span lifecycle and log records as they happen.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: TelemetryEvent);
}

/// Forwards every event to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: TelemetryEvent) {
        match event {
            TelemetryEvent::SpanStarted { span_id, name, kind, .. } => {
                tracing::debug!(span_id = %span_id, span = %name, kind = ?kind, "Span started");
            }
            TelemetryEvent::SpanEnded(record) => {
                let attributes = record
                    .attributes
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::info!(
                    span_id = %record.span_id,
                    span = %record.name,
                    status = ?record.status,
                    description = record.status_description.as_deref().unwrap_or(""),
                    duration_ms = record.duration.as_millis() as u64,
                    attributes = %attributes,
                    "Span ended"
                );
            }
            TelemetryEvent::Log(LogRecord {
                message,
                severity,
                properties,
                ..
            }) => match severity {
                Severity::Info => tracing::info!(properties = %properties, "{}", message),
                Severity::Warning => tracing::warn!(properties = %properties, "{}", message),
                Severity::Error => tracing::error!(properties = %properties, "{}", message),
            },
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.lock().clone()
    }

    /// Log records only.
    pub fn logs(&self) -> Vec<LogRecord> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                TelemetryEvent::Log(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    /// Records of sealed spans only.
    pub fn ended_spans(&self) -> Vec<SpanRecord> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                TelemetryEvent::SpanEnded(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of span-started events.
    pub fn started_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, TelemetryEvent::SpanStarted { .. }))
            .count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TelemetryEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: TelemetryEvent) {
        self.lock().push(event);
    }
}
