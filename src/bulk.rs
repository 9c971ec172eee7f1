//! Bulk operation coordination.
//!
//! Applies one fallible operation across many inputs without letting a
//! single failure abort the remainder. Each input transitions exactly once
//! from pending to succeeded or failed; retries, if any, belong to the
//! underlying operation.

use std::fmt;

/// A failed input with a human-readable reason.
#[derive(Debug, Clone)]
pub struct BulkFailure {
    /// Label identifying the input (an id, a row number, ...).
    pub label: String,
    /// Why the operation failed for this input.
    pub reason: String,
}

impl fmt::Display for BulkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.reason)
    }
}

/// Partitioned outcome of a bulk operation.
///
/// Both lists preserve input order.
#[derive(Debug, Clone)]
pub struct BulkOutcome<T> {
    /// Outputs of the inputs that succeeded.
    pub succeeded: Vec<T>,
    /// Inputs that failed, each with a reason.
    pub failed: Vec<BulkFailure>,
}

impl<T> BulkOutcome<T> {
    /// Creates an empty outcome.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Returns whether every input succeeded.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Renders counts plus a bounded sample of failure reasons.
    ///
    /// At most `sample_limit` reasons are listed; truncation is explicit
    /// ("...and N more") rather than silent.
    #[must_use]
    pub fn summary(&self, sample_limit: usize) -> String {
        let mut out = format!(
            "succeeded {}, failed {}",
            self.succeeded.len(),
            self.failed.len()
        );
        for failure in self.failed.iter().take(sample_limit) {
            out.push_str("\n  ");
            out.push_str(&failure.to_string());
        }
        if self.failed.len() > sample_limit {
            out.push_str(&format!("\n  ...and {} more", self.failed.len() - sample_limit));
        }
        out
    }
}

impl<T> Default for BulkOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `op` to every input in order, collecting per-item outcomes.
///
/// Never aborts partway: all inputs are processed regardless of failures.
/// `label` names each input for failure reporting.
pub fn run<I, T, L, F>(
    inputs: impl IntoIterator<Item = I>,
    mut label: L,
    mut op: F,
) -> BulkOutcome<T>
where
    L: FnMut(&I) -> String,
    F: FnMut(I) -> std::result::Result<T, String>,
{
    let mut outcome = BulkOutcome::new();
    for input in inputs {
        let item_label = label(&input);
        match op(input) {
            Ok(output) => outcome.succeeded.push(output),
            Err(reason) => outcome.failed.push(BulkFailure {
                label: item_label,
                reason,
            }),
        }
    }
    outcome
}
