//! Batch Module
//!
//! Concurrency-bounded bulk execution with partial-failure accounting.

mod executor;
mod options;
mod report;

// Re-export public types
pub use executor::execute;
pub use options::{BatchHooks, BatchOptions};
pub use report::{BatchReport, ItemFailure};

// == Public Constants ==
/// Failure message recorded for every item of a timed-out batch
pub const TIMEOUT_MESSAGE: &str = "operation timeout";
