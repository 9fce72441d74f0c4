//! Metrics collection.
//!
//! # Metrics
//! - `address_validations_total` (counter): validations by outcome
//!   (`valid`, `invalid`, `failed`)
//! - `address_validation_duration_seconds` (histogram): end-to-end latency
//! - `address_suggestion_searches_total` (counter): non-blank searches
//! - `address_suggestion_results` (histogram): suggestions per search
//! - `address_validation_cache_entries` (gauge): cached results

use std::time::Duration;

/// Record a finished validation call.
pub fn record_validation(outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!("address_validations_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("address_validation_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record a finished suggestion search.
pub fn record_search(results: usize) {
    ::metrics::counter!("address_suggestion_searches_total").increment(1);
    ::metrics::histogram!("address_suggestion_results").record(results as f64);
}

/// Record the number of cached validation results.
pub fn record_cache_size(size: usize) {
    ::metrics::gauge!("address_validation_cache_entries").set(size as f64);
}
