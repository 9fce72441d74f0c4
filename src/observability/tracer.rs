//! Span factory and structured log entry point.

use std::sync::Arc;
use std::time::SystemTime;

use crate::observability::sink::{EventSink, TracingSink};
use crate::observability::span::Span;
use crate::observability::types::{LogRecord, Properties, Severity, SpanKind, TelemetryEvent};

/// Source of span and log timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Creates spans and emits log records to a shared [`EventSink`].
///
/// Cloning is cheap; clones share the sink and clock.
#[derive(Clone)]
pub struct Tracer {
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl Tracer {
    /// Tracer using the system clock.
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self::with_clock(sink, Arc::new(SystemClock))
    }

    pub fn with_clock(sink: Arc<dyn EventSink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }

    /// Start a span and announce it to the sink.
    pub fn start_span(&self, name: impl Into<String>, kind: SpanKind) -> Span {
        Span::start(name.into(), kind, self.sink.clone(), self.clock.clone())
    }

    /// Emit a log record immediately.
    pub fn log_message(&self, message: impl Into<String>, severity: Severity, properties: Properties) {
        self.sink.emit(TelemetryEvent::Log(LogRecord {
            message: message.into(),
            severity,
            properties,
            timestamp: self.clock.now(),
        }));
    }

    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::sink::MemorySink;
    use crate::observability::types::{AttributeValue, SpanStatus};
    use std::time::Duration;

    struct FixedClock(SystemTime);

    impl Clock for FixedClock {
        fn now(&self) -> SystemTime {
            self.0
        }
    }

    #[test]
    fn test_log_message_is_immediate() {
        let sink = Arc::new(MemorySink::new());
        let tracer = Tracer::new(sink.clone());

        tracer.log_message(
            "Address validation failed",
            Severity::Error,
            Properties::new().with("error", "timeout"),
        );

        let logs = sink.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].severity, Severity::Error);
        assert_eq!(
            logs[0].properties.get("error"),
            Some(&AttributeValue::String("timeout".into()))
        );
        assert_eq!(sink.started_count(), 0);
    }

    #[test]
    fn test_clock_drives_timestamps() {
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let sink = Arc::new(MemorySink::new());
        let tracer = Tracer::with_clock(sink.clone(), Arc::new(FixedClock(at)));

        let mut span = tracer.start_span("address_validation", SpanKind::Performance);
        span.set_status(SpanStatus::Ok, "").unwrap();
        let record = span.end().unwrap();

        assert_eq!(record.started_at, at);
        assert_eq!(record.ended_at, at);
        assert_eq!(record.duration, Duration::ZERO);
    }
}
