//! Simulated address validation.
//!
//! # Data Flow
//! ```text
//! caller
//!     → service.rs (span, latency, cache, busy indicator)
//!     → engine.rs (scenario selection, field checks)
//!     → suggestions.rs (corrected address, search candidates)
//!     ← decision.rs supplies every random draw
//! ```
//!
//! # Error Classes
//! - Soft: input problems returned inside `ValidationResult::errors`
//! - Hard: simulated backend failures returned as `Err`
//!
//! `UnserviceableArea` can be either; callers tell them apart by whether the
//! call returned `Ok` or `Err`.

pub mod cache;
pub mod decision;
pub mod engine;
pub mod service;
pub mod suggestions;
pub mod types;

pub use cache::ResultCache;
pub use decision::{DecisionSource, ScriptedDecisions, SeededDecisions};
pub use engine::{ValidationEngine, ValidationScenario};
pub use service::AddressValidationService;
pub use suggestions::SuggestionGenerator;
pub use types::{
    Address, AddressSuggestion, AddressType, ValidationError, ValidationOutcome, ValidationResult,
};
