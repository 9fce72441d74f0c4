//! Corrected addresses and free-text address suggestions.

use uuid::Uuid;

use crate::validation::decision::DecisionSource;
use crate::validation::types::{Address, AddressSuggestion};

const STREETS: [&str; 8] = [
    "Main Street",
    "Oak Street",
    "First Street",
    "Second Street",
    "Park Avenue",
    "Elm Street",
    "Washington Street",
    "Lincoln Avenue",
];

const LOCALITIES: [(&str, &str, &str); 6] = [
    ("San Francisco", "CA", "94105"),
    ("New York", "NY", "10001"),
    ("Los Angeles", "CA", "90210"),
    ("Chicago", "IL", "60601"),
    ("Houston", "TX", "77001"),
    ("Phoenix", "AZ", "85001"),
];

/// Number of suggestions returned for a non-empty query.
pub const MIN_SUGGESTIONS: u64 = 3;
pub const MAX_SUGGESTIONS: u64 = 8;

/// House numbers used in generated suggestions.
pub const MIN_HOUSE_NUMBER: u64 = 100;
pub const MAX_HOUSE_NUMBER: u64 = 9999;

/// Confidence bounds for generated suggestions.
pub const MIN_SUGGESTION_CONFIDENCE: f64 = 0.70;
pub const MAX_SUGGESTION_CONFIDENCE: f64 = 0.95;

/// Builds corrected and candidate addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionGenerator;

impl SuggestionGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Apply the known street and ZIP corrections to a copy of `original`.
    ///
    /// The copy always gets a new id.
    pub fn correct(&self, original: &Address) -> Address {
        let street = if original.street.contains("123") {
            original.street.replace("123", "125")
        } else {
            original.street.clone()
        };

        let zip_code = if original.zip_code == "94105" {
            "94104".to_string()
        } else {
            original.zip_code.clone()
        };

        Address {
            id: Uuid::new_v4().to_string(),
            street,
            zip_code,
            ..original.clone()
        }
    }

    /// Generate ranked candidates for a free-text query.
    ///
    /// Blank queries return nothing without consulting `decisions`.
    pub fn search(&self, query: &str, decisions: &mut dyn DecisionSource) -> Vec<AddressSuggestion> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let count = decisions.between(MIN_SUGGESTIONS, MAX_SUGGESTIONS);
        let mut suggestions: Vec<AddressSuggestion> = (0..count)
            .map(|_| {
                let street_name = STREETS[decisions.pick(STREETS.len())];
                let (city, state, zip_code) = LOCALITIES[decisions.pick(LOCALITIES.len())];
                let number = decisions.between(MIN_HOUSE_NUMBER, MAX_HOUSE_NUMBER);
                let confidence =
                    decisions.between_f64(MIN_SUGGESTION_CONFIDENCE, MAX_SUGGESTION_CONFIDENCE);

                AddressSuggestion {
                    id: Uuid::new_v4(),
                    formatted_address: format!(
                        "{} {}, {}, {} {}",
                        number, street_name, city, state, zip_code
                    ),
                    street: format!("{} {}", number, street_name),
                    street2: None,
                    city: city.to_string(),
                    state: state.to_string(),
                    zip_code: zip_code.to_string(),
                    country: "US".to_string(),
                    confidence,
                }
            })
            .collect();

        suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        suggestions
    }
}
