//! Outcome selection for simulated address validation.
//!
//! # Responsibilities
//! - Choose a canned scenario standing in for a verification backend
//! - Derive field-level errors for the invalid scenario
//! - Raise a simulated backend failure on request
//!
//! # Design Decisions
//! - Pure: no latency, no telemetry, no shared state
//! - Scenario weighting is uniform across the four outcomes

use crate::validation::decision::DecisionSource;
use crate::validation::suggestions::SuggestionGenerator;
use crate::validation::types::{Address, ValidationError, ValidationOutcome, ValidationResult};

/// The canned outcome shapes of the simulated backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScenario {
    Valid,
    ValidWithSuggestion,
    InvalidAddress,
    PartialMatch,
}

impl ValidationScenario {
    pub const ALL: [ValidationScenario; 4] = [
        ValidationScenario::Valid,
        ValidationScenario::ValidWithSuggestion,
        ValidationScenario::InvalidAddress,
        ValidationScenario::PartialMatch,
    ];

    /// Confidence reported for results of this scenario.
    pub fn confidence(&self) -> f64 {
        match self {
            ValidationScenario::Valid => 0.95,
            ValidationScenario::ValidWithSuggestion => 0.85,
            ValidationScenario::InvalidAddress => 0.20,
            ValidationScenario::PartialMatch => 0.70,
        }
    }
}

/// Decides the result of validating one address.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine {
    suggestions: SuggestionGenerator,
}

impl ValidationEngine {
    pub fn new(suggestions: SuggestionGenerator) -> Self {
        Self { suggestions }
    }

    /// Validate `address`, or fail with a hard error when `simulate_error` is set.
    pub fn validate(
        &self,
        address: &Address,
        simulate_error: bool,
        decisions: &mut dyn DecisionSource,
    ) -> ValidationOutcome {
        if simulate_error {
            let failures = ValidationError::HARD_FAILURES;
            return Err(failures[decisions.pick(failures.len())]);
        }

        let scenario = ValidationScenario::ALL[decisions.pick(ValidationScenario::ALL.len())];
        Ok(self.resolve(scenario, address))
    }

    /// Build the result for a given scenario.
    pub fn resolve(&self, scenario: ValidationScenario, address: &Address) -> ValidationResult {
        let confidence = scenario.confidence();
        match scenario {
            ValidationScenario::Valid => ValidationResult {
                is_valid: true,
                suggested_address: None,
                confidence,
                errors: Vec::new(),
            },
            ValidationScenario::ValidWithSuggestion => ValidationResult {
                is_valid: false,
                suggested_address: Some(self.suggestions.correct(address)),
                confidence,
                errors: Vec::new(),
            },
            ValidationScenario::InvalidAddress => ValidationResult {
                is_valid: false,
                suggested_address: None,
                confidence,
                errors: field_errors(address),
            },
            ValidationScenario::PartialMatch => ValidationResult {
                is_valid: false,
                suggested_address: Some(self.suggestions.correct(address)),
                confidence,
                errors: vec![ValidationError::InvalidZipCode],
            },
        }
    }
}

/// Field checks for an address the backend rejected. Never empty.
pub fn field_errors(address: &Address) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if address.street.chars().count() < 5 {
        errors.push(ValidationError::InvalidStreetAddress);
    }

    if !is_five_digit_zip(&address.zip_code) {
        errors.push(ValidationError::InvalidZipCode);
    }

    if address.city.chars().count() < 2 {
        errors.push(ValidationError::InvalidCity);
    }

    if address.state.chars().count() != 2 {
        errors.push(ValidationError::InvalidState);
    }

    if errors.is_empty() {
        errors.push(ValidationError::UnserviceableArea);
    }

    errors
}

fn is_five_digit_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}
