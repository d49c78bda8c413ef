//! Observable form state.

use formguard_validator::{Candidate, FieldErrors, ProgressUpdate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Everything a UI renders for one form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    /// Current full value
    pub value: Candidate,
    /// Errors of the latest completed validation, as returned by the node
    pub errors: FieldErrors,
    /// Field paths the user has interacted with
    pub touched: BTreeSet<String>,
    /// A validation is in flight
    pub validating: bool,
    /// Latest progress report per field path of the in-flight validation
    pub progress: BTreeMap<String, ProgressUpdate>,
    pub submit_count: u32,
}

impl FormState {
    pub(crate) fn new(value: Candidate) -> Self {
        Self {
            value,
            errors: FieldErrors::new(),
            touched: BTreeSet::new(),
            validating: false,
            progress: BTreeMap::new(),
            submit_count: 0,
        }
    }

    /// Error shown for `field`, if any.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    #[must_use]
    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Errors of touched fields only, for inline display before submission.
    pub fn visible_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .filter(|(key, _)| self.submit_count > 0 || self.touched.contains(*key))
    }

    /// Paths of the value's top-level fields.
    pub(crate) fn field_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .value
            .as_record()
            .map(|record| record.keys().cloned().collect())
            .unwrap_or_default();
        paths.extend(self.errors.keys().map(str::to_owned));
        paths
    }
}
