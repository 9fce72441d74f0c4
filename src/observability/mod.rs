//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! AddressValidationService
//!     → tracer.rs (start spans, emit log records)
//!     → span.rs (attributes, status, seal)
//!     → sink.rs (EventSink: tracing subscriber or in-memory capture)
//!
//! Internal diagnostics:
//!     → logging.rs (tracing-subscriber setup)
//!     → metrics.rs (counters, gauges, histograms)
//! ```
//!
//! # Design Decisions
//! - The tracer is an explicit value handed to each service, never a global
//! - Span records and logs reach consumers as typed events, not text
//! - Metrics go through the `metrics` facade; installing an exporter is the
//!   embedding application's job

pub mod logging;
pub mod metrics;
pub mod sink;
pub mod span;
pub mod tracer;
pub mod types;

pub use sink::{EventSink, MemorySink, TracingSink};
pub use span::Span;
pub use tracer::{Clock, SystemClock, Tracer};
pub use types::{
    AttributeValue, LogRecord, Properties, Severity, SpanKind, SpanRecord, SpanStatus,
    TelemetryError, TelemetryEvent, TelemetryResult,
};
