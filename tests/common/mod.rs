//! Shared fixtures for integration tests.

use std::sync::Arc;

use address_validation::config::LatencyConfig;
use address_validation::observability::{MemorySink, Tracer};
use address_validation::validation::{
    Address, AddressValidationService, DecisionSource, ScriptedDecisions, SeededDecisions,
};

/// A service wired to an in-memory sink.
pub fn service_with(decisions: Box<dyn DecisionSource>) -> (Arc<AddressValidationService>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let service = AddressValidationService::new(
        Tracer::new(sink.clone()),
        decisions,
        LatencyConfig::default(),
    );
    (Arc::new(service), sink)
}

/// A seeded service with the default latency ranges.
pub fn seeded_service(seed: u64) -> (Arc<AddressValidationService>, Arc<MemorySink>) {
    service_with(Box::new(SeededDecisions::new(seed)))
}

/// A service whose scenario picks are fixed in advance.
#[allow(dead_code)]
pub fn scripted_service(picks: &[usize]) -> (Arc<AddressValidationService>, Arc<MemorySink>) {
    service_with(Box::new(ScriptedDecisions::new().with_picks(picks.to_vec())))
}

#[allow(dead_code)]
pub fn downtown() -> Address {
    Address::new("123 Main St", "San Francisco", "CA", "94105").with_name("Ada", "Lovelace")
}

#[allow(dead_code)]
pub fn midtown() -> Address {
    Address::new("350 Fifth Avenue", "New York", "NY", "10118").with_name("Grace", "Hopper")
}
