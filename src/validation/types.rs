//! Address validation types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// What an address is used for at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    #[default]
    Shipping,
    Billing,
    Both,
}

/// A postal address as entered by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Opaque unique identifier.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub street2: Option<String>,
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
    #[serde(rename = "type")]
    pub address_type: AddressType,
}

impl Address {
    /// Create a shipping address with a freshly generated id.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: String::new(),
            last_name: String::new(),
            street: street.into(),
            street2: None,
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
            country: "US".to_string(),
            is_default: false,
            address_type: AddressType::Shipping,
        }
    }

    /// Set the recipient name.
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }
}

/// Errors reported by address validation.
///
/// The first five kinds describe problems with the input and come back inside
/// [`ValidationResult::errors`]. `NetworkTimeout`, `ServiceUnavailable` and
/// `UnserviceableArea` can also abort a call outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Please enter a valid street address")]
    InvalidStreetAddress,

    #[error("Please enter a valid city name")]
    InvalidCity,

    #[error("Please enter a valid state")]
    InvalidState,

    #[error("Please enter a valid ZIP code")]
    InvalidZipCode,

    #[error("We don't deliver to this area")]
    UnserviceableArea,

    #[error("Address validation timed out. Please try again")]
    NetworkTimeout,

    #[error("Address validation service is temporarily unavailable")]
    ServiceUnavailable,
}

impl ValidationError {
    /// Kinds that a simulated backend failure may raise.
    pub const HARD_FAILURES: [ValidationError; 3] = [
        ValidationError::NetworkTimeout,
        ValidationError::ServiceUnavailable,
        ValidationError::UnserviceableArea,
    ];

    /// Stable snake_case name, used as the `error.type` span attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidStreetAddress => "invalid_street_address",
            ValidationError::InvalidCity => "invalid_city",
            ValidationError::InvalidState => "invalid_state",
            ValidationError::InvalidZipCode => "invalid_zip_code",
            ValidationError::UnserviceableArea => "unserviceable_area",
            ValidationError::NetworkTimeout => "network_timeout",
            ValidationError::ServiceUnavailable => "service_unavailable",
        }
    }

    /// Whether this kind can abort a call instead of being reported in a result.
    pub fn is_hard_failure_kind(&self) -> bool {
        Self::HARD_FAILURES.contains(self)
    }
}

/// Outcome of validating one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub suggested_address: Option<Address>,
    /// Certainty in `[0, 1]`.
    pub confidence: f64,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_suggestion(&self) -> bool {
        self.suggested_address.is_some()
    }
}

/// Result type for a single validation call.
pub type ValidationOutcome = Result<ValidationResult, ValidationError>;

/// A candidate address produced by free-text search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    pub id: Uuid,
    /// e.g. "125 Main Street, San Francisco, CA 94105".
    pub formatted_address: String,
    pub street: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub confidence: f64,
}
