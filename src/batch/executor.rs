//! Batch Executor Module
//!
//! Splits bulk input into fixed-size batches and runs them concurrently
//! under a semaphore-bounded gate with a per-batch deadline. Failures are
//! absorbed into per-item accounting; the executor itself only fails on
//! unusable options.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::batch::{BatchHooks, BatchOptions, BatchReport, ItemFailure, TIMEOUT_MESSAGE};
use crate::error::Result;

// == Execute ==
/// Runs `batch_fn` over `items` in contiguous batches of
/// `options.batch_size`, with at most `options.max_concurrency` batches in
/// flight at once.
///
/// Every batch is scheduled up front; a semaphore permit held for the
/// duration of each batch enforces the concurrency bound. A batch that
/// outlives `options.per_batch_timeout` is cancelled (its future dropped)
/// and every item in it is recorded as failed with a fixed timeout
/// message. One batch failing never stops the others.
///
/// Outcomes are folded into the report in batch order, so error indices
/// and partial results line up with the original input regardless of
/// completion order.
///
/// # Arguments
/// * `items` - The full input; chunked without reordering
/// * `batch_fn` - Async operation applied to each batch
/// * `options` - Partitioning, parallelism and deadline settings
/// * `hooks` - Optional progress and error callbacks
///
/// # Returns
/// A [`BatchReport`] where `processed == successful + failed` covers every
/// input item, or [`crate::Error::InvalidOptions`] if `options` cannot
/// schedule work. No other error is ever returned.
pub async fn execute<T, R, E, F, Fut>(
    items: Vec<T>,
    batch_fn: F,
    options: &BatchOptions,
    hooks: BatchHooks<T>,
) -> Result<BatchReport<T, R>>
where
    T: Clone + Send + Sync + 'static,
    R: Send + 'static,
    E: Display + Send + 'static,
    F: Fn(Vec<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
{
    options.validate()?;

    if items.is_empty() {
        return Ok(BatchReport::empty());
    }

    let started = Instant::now();
    let total = items.len();
    let batch_size = options.batch_size;
    let batch_count = total.div_ceil(batch_size);

    debug!(
        "executing {} items as {} batches of up to {} (concurrency {})",
        total, batch_count, batch_size, options.max_concurrency
    );

    let semaphore = Arc::new(Semaphore::new(options.max_concurrency));
    let batch_fn = Arc::new(batch_fn);
    let per_batch_timeout = options.per_batch_timeout;

    // Schedule everything up front; the semaphore, not the spawn loop,
    // limits how many batches actually run at once.
    let mut handles = Vec::with_capacity(batch_count);
    for chunk in items.chunks(batch_size) {
        let chunk = chunk.to_vec();
        let semaphore = Arc::clone(&semaphore);
        let batch_fn = Arc::clone(&batch_fn);

        handles.push(tokio::spawn(async move {
            // Permit held for the whole batch, released on drop whether
            // the batch succeeds, fails or times out.
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return Err("concurrency gate closed".to_string()),
            };

            match timeout(per_batch_timeout, batch_fn(chunk)).await {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(err)) => Err(err.to_string()),
                Err(_) => Err(TIMEOUT_MESSAGE.to_string()),
            }
        }));
    }

    let mut report = BatchReport {
        processed: total,
        successful: 0,
        failed: 0,
        skipped: 0,
        errors: Vec::new(),
        duration_ms: 0,
        partial_results: Vec::with_capacity(batch_count),
    };

    // Items covered by successful batches so far, reported to on_progress
    let mut completed = 0usize;

    for (batch_idx, handle) in handles.into_iter().enumerate() {
        let start = batch_idx * batch_size;
        let end = (start + batch_size).min(total);
        let batch_items = &items[start..end];

        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => Err(format!("batch task failed: {join_err}")),
        };

        match outcome {
            Ok(result) => {
                report.successful += batch_items.len();
                report.partial_results.push(result);
                completed += batch_items.len();

                if let Some(on_progress) = hooks.on_progress.as_ref() {
                    on_progress(completed, total);
                }

                debug!(
                    "batch {}/{} succeeded ({} items, {} done)",
                    batch_idx + 1,
                    batch_count,
                    batch_items.len(),
                    completed
                );
            }
            Err(message) => {
                report.failed += batch_items.len();
                for (offset, record) in batch_items.iter().enumerate() {
                    report.errors.push(ItemFailure {
                        index: start + offset,
                        message: message.clone(),
                        record: record.clone(),
                    });
                }

                if let Some(on_error) = hooks.on_error.as_ref() {
                    on_error(&message, batch_items);
                }

                warn!(
                    "batch {}/{} failed ({} items): {}",
                    batch_idx + 1,
                    batch_count,
                    batch_items.len(),
                    message
                );
            }
        }
    }

    report.duration_ms = started.elapsed().as_millis() as u64;
    Ok(report)
}
