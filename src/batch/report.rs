//! Batch Report Module
//!
//! Aggregate accounting produced by every bulk operation.

use serde::Serialize;

// == Item Failure ==
/// One failed input record with its position in the original input.
///
/// The index is global across the whole input, not batch-relative, so a
/// caller can line failures back up with what it submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFailure<T> {
    /// Zero-based position of the record in the original input
    pub index: usize,
    /// Failure message propagated from the batch operation
    pub message: String,
    /// The record that failed
    pub record: T,
}

// == Batch Report ==
/// Outcome summary for one bulk operation.
///
/// `processed` always equals `successful + failed` and covers every item
/// handed to the executor; records dropped before dispatch appear in
/// `skipped` and nowhere else.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport<T, R> {
    /// Items handed to batches (successful + failed)
    pub processed: usize,
    /// Items whose batch completed successfully
    pub successful: usize,
    /// Items whose batch failed or timed out
    pub failed: usize,
    /// Items dropped by pre-validation before any batch ran
    pub skipped: usize,
    /// Per-item failure details, in input order
    pub errors: Vec<ItemFailure<T>>,
    /// Wall-clock duration of the whole operation in milliseconds
    pub duration_ms: u64,
    /// Results of successful batches, in batch order
    pub partial_results: Vec<R>,
}

impl<T, R> BatchReport<T, R> {
    // == Empty ==
    /// A report for an operation that had nothing to do.
    pub fn empty() -> Self {
        Self {
            processed: 0,
            successful: 0,
            failed: 0,
            skipped: 0,
            errors: Vec::new(),
            duration_ms: 0,
            partial_results: Vec::new(),
        }
    }

    // == Is Complete Success ==
    /// True when no item failed.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    // == Summary ==
    /// One-line human-readable outcome, suitable for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} of {} items succeeded ({} failed, {} skipped) in {}ms",
            self.successful, self.processed, self.failed, self.skipped, self.duration_ms
        )
    }
}
