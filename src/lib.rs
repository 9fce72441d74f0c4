//! Simulated address validation with span telemetry.

pub mod config;
pub mod observability;
pub mod validation;

pub use config::ServiceConfig;
pub use observability::Tracer;
pub use validation::AddressValidationService;
