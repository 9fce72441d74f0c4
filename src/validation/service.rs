//! Instrumented, latency-simulating front end for address validation.
//!
//! # Responsibilities
//! - Wrap every validation and search call in a span
//! - Simulate backend latency
//! - Cache the latest result per address id
//! - Expose a busy indicator while validations are in flight
//!
//! # Call Sequence
//! ```text
//! start span → set input attributes → sleep → engine / generator
//!     → set outcome attributes + status → end span → one log record → return
//! ```
//!
//! Each call body runs as its own tokio task. A caller that stops polling
//! (timeout, `select!`, aborted task) only stops waiting: the body still
//! sleeps, ends its span, logs and updates the cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::task::JoinError;

use crate::config::{LatencyConfig, ServiceConfig};
use crate::observability::metrics;
use crate::observability::{Properties, Severity, Span, SpanKind, SpanStatus, TelemetryResult, Tracer};
use crate::validation::cache::ResultCache;
use crate::validation::decision::{DecisionSource, SeededDecisions};
use crate::validation::engine::ValidationEngine;
use crate::validation::suggestions::SuggestionGenerator;
use crate::validation::types::{
    Address, AddressSuggestion, ValidationError, ValidationOutcome, ValidationResult,
};

/// Span name for `validate_address`.
pub const VALIDATION_SPAN: &str = "address_validation";
/// Span name for `search_address_suggestions`.
pub const SEARCH_SPAN: &str = "address_suggestions_search";

/// Simulated address-verification service.
///
/// Calls may overlap freely; share it behind an `Arc`.
pub struct AddressValidationService {
    core: Arc<ServiceCore>,
    in_flight: Arc<AtomicUsize>,
}

/// State shared with the detached call bodies.
struct ServiceCore {
    engine: ValidationEngine,
    suggestions: SuggestionGenerator,
    tracer: Tracer,
    decisions: Mutex<Box<dyn DecisionSource>>,
    latency: LatencyConfig,
    cache: ResultCache,
}

impl AddressValidationService {
    pub fn new(tracer: Tracer, decisions: Box<dyn DecisionSource>, latency: LatencyConfig) -> Self {
        let suggestions = SuggestionGenerator::new();
        Self {
            core: Arc::new(ServiceCore {
                engine: ValidationEngine::new(suggestions),
                suggestions,
                tracer,
                decisions: Mutex::new(decisions),
                latency,
                cache: ResultCache::new(),
            }),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build from configuration, seeding the RNG from `simulation.seed` when set.
    pub fn from_config(config: &ServiceConfig, tracer: Tracer) -> Self {
        Self::new(
            tracer,
            Box::new(SeededDecisions::from_optional_seed(config.simulation.seed)),
            config.latency.clone(),
        )
    }

    /// Validate an address against the simulated backend.
    ///
    /// With `simulate_error` set the call always fails with one of
    /// [`ValidationError::HARD_FAILURES`] and leaves the cache untouched.
    /// Dropping the returned future does not cancel the validation.
    pub async fn validate_address(&self, address: &Address, simulate_error: bool) -> ValidationOutcome {
        let busy = BusyGuard::enter(&self.in_flight);
        let core = Arc::clone(&self.core);
        let address = address.clone();

        let call = tokio::spawn(async move {
            let _busy = busy;
            core.validate(&address, simulate_error).await
        });

        settle(call.await, VALIDATION_SPAN).unwrap_or(Err(ValidationError::ServiceUnavailable))
    }

    /// Suggest addresses matching a free-text query.
    ///
    /// Blank queries return immediately with no span and no delay.
    pub async fn search_address_suggestions(&self, query: &str) -> Vec<AddressSuggestion> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let core = Arc::clone(&self.core);
        let query = query.to_string();
        let call = tokio::spawn(async move { core.search(&query).await });

        settle(call.await, SEARCH_SPAN).unwrap_or_default()
    }

    /// True while at least one validation is in flight.
    pub fn is_validating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Latest cached result for an address id.
    pub fn cached_result(&self, address_id: &str) -> Option<ValidationResult> {
        self.core.cache.get(address_id)
    }

    pub fn cache(&self) -> &ResultCache {
        &self.core.cache
    }

    pub fn clear_cache(&self) {
        self.core.cache.clear();
    }

    pub fn tracer(&self) -> &Tracer {
        &self.core.tracer
    }
}

impl ServiceCore {
    async fn validate(&self, address: &Address, simulate_error: bool) -> ValidationOutcome {
        let started = Instant::now();

        let mut span = self.tracer.start_span(VALIDATION_SPAN, SpanKind::Performance);
        report(tag_address(&mut span, address));

        tokio::time::sleep(self.draw_delay(self.latency.validation_range())).await;

        let outcome = {
            let mut decisions = self.decisions();
            self.engine.validate(address, simulate_error, &mut **decisions)
        };

        match &outcome {
            Ok(result) => {
                self.cache.store(&address.id, result.clone());
                report(record_result(&mut span, result));
                self.log_result(address, result);

                let label = if result.is_valid { "valid" } else { "invalid" };
                metrics::record_validation(label, started.elapsed());
            }
            Err(error) => {
                report(record_failure(&mut span, error));
                self.tracer.log_message(
                    "Address validation failed",
                    Severity::Error,
                    Properties::new()
                        .with("address_id", &address.id)
                        .with("error", error.to_string())
                        .with("error_type", error.kind()),
                );
                metrics::record_validation("failed", started.elapsed());
            }
        }

        outcome
    }

    async fn search(&self, query: &str) -> Vec<AddressSuggestion> {
        let mut span = self.tracer.start_span(SEARCH_SPAN, SpanKind::Performance);
        report(tag_query(&mut span, query));

        tokio::time::sleep(self.draw_delay(self.latency.search_range())).await;

        let suggestions = {
            let mut decisions = self.decisions();
            self.suggestions.search(query, &mut **decisions)
        };

        report(record_search(&mut span, suggestions.len()));
        self.tracer.log_message(
            "Address suggestions retrieved",
            Severity::Info,
            Properties::new()
                .with("query", query)
                .with("results_count", suggestions.len()),
        );
        metrics::record_search(suggestions.len());

        suggestions
    }

    fn log_result(&self, address: &Address, result: &ValidationResult) {
        if result.has_errors() {
            let descriptions: Vec<String> = result.errors.iter().map(|e| e.to_string()).collect();
            self.tracer.log_message(
                format!("Address validation errors: {:?}", descriptions),
                Severity::Warning,
                Properties::new()
                    .with("address_id", &address.id)
                    .with("error_count", result.errors.len())
                    .with("city", &address.city)
                    .with("state", &address.state),
            );
        } else {
            self.tracer.log_message(
                "Address validated",
                Severity::Info,
                Properties::new()
                    .with("address_id", &address.id)
                    .with("is_valid", result.is_valid)
                    .with("confidence", result.confidence),
            );
        }
    }

    fn draw_delay(&self, (min, max): (Duration, Duration)) -> Duration {
        if min >= max {
            return min;
        }
        let millis = self
            .decisions()
            .between(min.as_millis() as u64, max.as_millis() as u64);
        Duration::from_millis(millis)
    }

    fn decisions(&self) -> MutexGuard<'_, Box<dyn DecisionSource>> {
        self.decisions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Unwrap a call body's join result, resuming a panic if the body panicked.
///
/// `None` means the runtime cancelled the body while shutting down.
fn settle<T>(joined: Result<T, JoinError>, call: &'static str) -> Option<T> {
    match joined {
        Ok(value) => Some(value),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            tracing::warn!(call, error = %e, "Call cancelled by runtime shutdown");
            None
        }
    }
}

/// Marks a validation as in flight for as long as it lives.
struct BusyGuard {
    counter: Arc<AtomicUsize>,
}

impl BusyGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

fn tag_address(span: &mut Span, address: &Address) -> TelemetryResult<()> {
    span.set_attribute("address.city", &address.city)?;
    span.set_attribute("address.state", &address.state)?;
    span.set_attribute("address.zip_code", &address.zip_code)?;
    Ok(())
}

fn record_result(span: &mut Span, result: &ValidationResult) -> TelemetryResult<()> {
    span.set_attribute("validation.is_valid", result.is_valid)?;
    span.set_attribute("validation.confidence", result.confidence)?;
    span.set_attribute("validation.has_suggestion", result.has_suggestion())?;
    span.set_status(SpanStatus::Ok, "")?;
    span.end()?;
    Ok(())
}

fn record_failure(span: &mut Span, error: &ValidationError) -> TelemetryResult<()> {
    let message = error.to_string();
    span.set_attribute("error.type", error.kind())?;
    span.set_attribute("error.message", message.as_str())?;
    span.set_status(SpanStatus::Error, message)?;
    span.end()?;
    Ok(())
}

/// `search.query_length` counts Unicode scalar values, not grapheme clusters:
/// "e\u{301}" counts as 2.
fn tag_query(span: &mut Span, query: &str) -> TelemetryResult<()> {
    span.set_attribute("search.query", query)?;
    span.set_attribute("search.query_length", query.chars().count())?;
    Ok(())
}

fn record_search(span: &mut Span, results: usize) -> TelemetryResult<()> {
    span.set_attribute("search.results_count", results)?;
    span.set_status(SpanStatus::Ok, "")?;
    span.end()?;
    Ok(())
}

/// Telemetry problems are reported, never allowed to change a call's outcome.
fn report(result: TelemetryResult<()>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Telemetry instrumentation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::{AttributeValue, MemorySink, TelemetryEvent};
    use crate::validation::decision::ScriptedDecisions;
    use std::sync::Arc;

    fn service(decisions: ScriptedDecisions) -> (Arc<AddressValidationService>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let service = AddressValidationService::new(
            Tracer::new(sink.clone()),
            Box::new(decisions),
            LatencyConfig::default(),
        );
        (Arc::new(service), sink)
    }

    fn address() -> Address {
        Address::new("123 Main St", "San Francisco", "CA", "94105")
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_result_is_cached_and_traced() {
        let (service, sink) = service(ScriptedDecisions::new().with_picks([0]));
        let address = address();

        let result = service.validate_address(&address, false).await.unwrap();
        assert!(result.is_valid);
        assert_eq!(service.cached_result(&address.id), Some(result));
        assert!(!service.is_validating());

        let spans = sink.ended_spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, VALIDATION_SPAN);
        assert_eq!(spans[0].status, SpanStatus::Ok);
        assert_eq!(
            spans[0].attribute("address.zip_code"),
            Some(&AttributeValue::String("94105".into()))
        );
        assert_eq!(
            spans[0].attribute("validation.confidence"),
            Some(&AttributeValue::Float(0.95))
        );

        let logs = sink.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].severity, Severity::Info);
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_errors_log_a_warning() {
        let (service, sink) = service(ScriptedDecisions::new().with_picks([3]));
        let address = address();

        let result = service.validate_address(&address, false).await.unwrap();
        assert_eq!(result.errors, vec![ValidationError::InvalidZipCode]);

        let logs = sink.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].severity, Severity::Warning);
        assert_eq!(
            logs[0].message,
            "Address validation errors: [\"Please enter a valid ZIP code\"]"
        );
        assert_eq!(logs[0].properties.get("error_count"), Some(&AttributeValue::Int(1)));
        assert_eq!(
            sink.ended_spans()[0].attribute("validation.has_suggestion"),
            Some(&AttributeValue::Bool(true))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hard_failure_is_returned_unchanged() {
        let (service, sink) = service(ScriptedDecisions::new().with_picks([1]));
        let address = address();

        let err = service.validate_address(&address, true).await.unwrap_err();
        assert_eq!(err, ValidationError::ServiceUnavailable);
        assert!(service.cached_result(&address.id).is_none());
        assert!(!service.is_validating());

        let span = &sink.ended_spans()[0];
        assert_eq!(span.status, SpanStatus::Error);
        assert_eq!(span.status_description.as_deref(), Some(err.to_string().as_str()));
        assert_eq!(
            span.attribute("error.type"),
            Some(&AttributeValue::String("service_unavailable".into()))
        );

        let logs = sink.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].severity, Severity::Error);
        assert_eq!(logs[0].message, "Address validation failed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_order_within_a_call() {
        let (service, sink) = service(ScriptedDecisions::new());
        service.validate_address(&address(), false).await.unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], TelemetryEvent::SpanStarted { .. }));
        assert!(matches!(events[1], TelemetryEvent::SpanEnded(_)));
        assert!(matches!(events[2], TelemetryEvent::Log(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let (service, _sink) = service(ScriptedDecisions::new().with_integers([1200]));
        let before = tokio::time::Instant::now();
        service.validate_address(&address(), false).await.unwrap();
        let elapsed = before.elapsed();
        assert!(elapsed >= Duration::from_millis(1200));
        assert!(elapsed < Duration::from_millis(1300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_while_in_flight() {
        let (service, _sink) = service(ScriptedDecisions::new());
        let task = {
            let service = service.clone();
            tokio::spawn(async move { service.validate_address(&address(), false).await })
        };

        tokio::task::yield_now().await;
        assert!(service.is_validating());

        task.await.unwrap().unwrap();
        assert!(!service.is_validating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_records_result_count() {
        // delay, count, then house numbers
        let (service, sink) = service(ScriptedDecisions::new().with_integers([300, 5]));

        let results = service.search_address_suggestions("main").await;
        assert_eq!(results.len(), 5);

        let span = &sink.ended_spans()[0];
        assert_eq!(span.name, SEARCH_SPAN);
        assert_eq!(span.attribute("search.results_count"), Some(&AttributeValue::Int(5)));
        assert_eq!(span.attribute("search.query_length"), Some(&AttributeValue::Int(4)));

        let logs = sink.logs();
        assert_eq!(logs[0].message, "Address suggestions retrieved");
        assert_eq!(logs[0].properties.get("results_count"), Some(&AttributeValue::Int(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_search_is_silent_and_immediate() {
        let (service, sink) = service(ScriptedDecisions::new());
        let before = tokio::time::Instant::now();

        assert!(service.search_address_suggestions("").await.is_empty());
        assert!(service.search_address_suggestions(" \t ").await.is_empty());

        assert_eq!(before.elapsed(), Duration::ZERO);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_instant_latency_from_config() {
        let mut config = ServiceConfig::default();
        config.latency = LatencyConfig::instant();
        config.simulation.seed = Some(5);
        let service = AddressValidationService::from_config(&config, Tracer::new(Arc::new(MemorySink::new())));

        let result = service.validate_address(&address(), false).await.unwrap();
        assert!((0.0..=1.0).contains(&result.confidence));
        assert_eq!(service.cache().len(), 1);

        service.clear_cache();
        assert!(service.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_validation_still_finishes() {
        let (service, sink) = service(ScriptedDecisions::new().with_integers([1200]));
        let address = address();

        let waited =
            tokio::time::timeout(Duration::from_millis(100), service.validate_address(&address, false)).await;
        assert!(waited.is_err());
        assert!(service.is_validating());
        assert_eq!(sink.started_count(), 1);
        assert!(sink.ended_spans().is_empty());

        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(!service.is_validating());
        let spans = sink.ended_spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].status, SpanStatus::Ok);
        assert_eq!(sink.logs().len(), 1);
        assert!(service.cached_result(&address.id).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_search_still_finishes() {
        let (service, sink) = service(ScriptedDecisions::new().with_integers([600, 4]));

        tokio::select! {
            _ = service.search_address_suggestions("oak") => panic!("search finished before its delay"),
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }

        tokio::time::sleep(Duration::from_secs(1)).await;

        let spans = sink.ended_spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].attribute("search.results_count"), Some(&AttributeValue::Int(4)));
        assert_eq!(sink.logs().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_length_counts_scalar_values() {
        let (service, sink) = service(ScriptedDecisions::new());
        service.search_address_suggestions("caf\u{e9} e\u{301}").await;

        assert_eq!(
            sink.ended_spans()[0].attribute("search.query_length"),
            Some(&AttributeValue::Int(7))
        );
    }
}
