//! Batch Options Module
//!
//! Tuning knobs and observation hooks for a single bulk operation.

use std::time::Duration;

use crate::error::{Error, Result};

// == Batch Options ==
/// Controls partitioning, parallelism and deadline for one bulk call.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Number of records per sub-batch
    pub batch_size: usize,
    /// Maximum number of batches in flight at once
    pub max_concurrency: usize,
    /// Deadline applied to each batch individually, not the whole call
    pub per_batch_timeout: Duration,
}

impl BatchOptions {
    // == Constructor ==
    /// Creates options with explicit values.
    ///
    /// # Arguments
    /// * `batch_size` - Records per sub-batch
    /// * `max_concurrency` - Concurrent in-flight batches
    /// * `per_batch_timeout` - Deadline for each batch
    pub fn new(batch_size: usize, max_concurrency: usize, per_batch_timeout: Duration) -> Self {
        Self {
            batch_size,
            max_concurrency,
            per_batch_timeout,
        }
    }

    // == Validate ==
    /// Rejects option combinations that cannot schedule any work.
    ///
    /// This is the only early failure the executor produces; everything
    /// after validation is reported per item instead.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidOptions(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(Error::InvalidOptions(
                "max_concurrency must be greater than zero".to_string(),
            ));
        }
        if self.per_batch_timeout.is_zero() {
            return Err(Error::InvalidOptions(
                "per_batch_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrency: 5,
            per_batch_timeout: Duration::from_millis(30_000),
        }
    }
}

// == Batch Hooks ==
/// Optional callbacks observing batch completion.
///
/// `on_progress` runs after each successful batch with the number of
/// items processed so far and the total. `on_error` runs once per failed
/// batch with the failure message and the batch's records. Neither
/// influences execution.
pub struct BatchHooks<T> {
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send + Sync>>,
    pub on_error: Option<Box<dyn Fn(&str, &[T]) + Send + Sync>>,
}

impl<T> Default for BatchHooks<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> BatchHooks<T> {
    // == Constructor ==
    /// Creates hooks that observe nothing.
    pub fn none() -> Self {
        Self {
            on_progress: None,
            on_error: None,
        }
    }

    // == With Progress ==
    /// Attaches a progress callback.
    pub fn with_progress(mut self, f: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    // == With Error ==
    /// Attaches a per-batch error callback.
    pub fn with_error(mut self, f: impl Fn(&str, &[T]) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}
