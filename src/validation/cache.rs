//! Per-address cache of validation results.

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::observability::metrics;
use crate::validation::types::ValidationResult;

/// A thread-safe map of address id to the latest validation result.
///
/// Concurrent writes for the same id are last-write-wins.
#[derive(Clone, Default)]
pub struct ResultCache {
    inner: Arc<DashMap<String, ValidationResult>>,
}

impl ResultCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result observed for an address.
    pub fn store(&self, address_id: &str, result: ValidationResult) {
        self.inner.insert(address_id.to_string(), result);
        metrics::record_cache_size(self.inner.len());
    }

    /// Latest result for an address, if any.
    pub fn get(&self, address_id: &str) -> Option<ValidationResult> {
        self.inner.get(address_id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.inner.clear();
        metrics::record_cache_size(0);
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> HashMap<String, ValidationResult> {
        self.inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    /// Count of (valid, not valid) cached results.
    pub fn summary(&self) -> (usize, usize) {
        let mut valid = 0;
        let mut invalid = 0;
        for r in self.inner.iter() {
            if r.value().is_valid {
                valid += 1;
            } else {
                invalid += 1;
            }
        }
        (valid, invalid)
    }
}
