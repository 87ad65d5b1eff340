//! Monitor Module
//!
//! Collects latency and outcome samples for executed operations and
//! derives threshold alerts from them. Strictly observational: recording
//! never influences what the layer does.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::warn;

// == Public Constants ==
/// Most recent samples retained for inspection
pub const MAX_SAMPLES: usize = 1024;

// == Operation Sample ==
/// One executed operation, as observed from the outside.
#[derive(Debug, Clone, Serialize)]
pub struct OperationSample {
    /// Operation name, e.g. `bulk_create_parts` or `search_parts`
    pub operation: String,
    pub duration_ms: u64,
    pub success: bool,
    /// Rows the operation touched, when the operation knows
    pub rows_affected: Option<u64>,
    /// First failure message, when the operation failed
    pub error_message: Option<String>,
}

// == Operation Aggregate ==
/// Running totals per operation name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OperationAggregate {
    pub count: u64,
    pub failures: u64,
    pub total_duration_ms: u64,
    pub max_duration_ms: u64,
}

impl OperationAggregate {
    /// Mean duration across all recorded runs.
    pub fn average_ms(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.total_duration_ms / self.count
        }
    }

    /// Share of runs that failed, 0.0 to 1.0.
    pub fn failure_ratio(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.failures as f64 / self.count as f64
        }
    }
}

// == Alert ==
/// A threshold crossed by an operation's aggregate behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    SlowOperation {
        operation: String,
        average_ms: u64,
        threshold_ms: u64,
    },
    HighErrorRate {
        operation: String,
        failure_ratio: f64,
        threshold: f64,
    },
}

// == Alert Thresholds ==
/// Limits an operation must cross before it alerts.
#[derive(Debug, Clone)]
pub struct AlertThresholds {
    /// Average duration above this flags the operation as slow
    pub slow_average_ms: u64,
    /// Failure ratio above this flags the operation as failing
    pub error_ratio: f64,
    /// Aggregates with fewer runs than this never alert
    pub min_samples: u64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            slow_average_ms: 1000,
            error_ratio: 0.5,
            min_samples: 5,
        }
    }
}

// == Perf Monitor ==
/// Shared sample sink for the bulk and search layers.
#[derive(Debug, Default)]
pub struct PerfMonitor {
    inner: RwLock<MonitorInner>,
    thresholds: AlertThresholds,
}

#[derive(Debug, Default)]
struct MonitorInner {
    samples: VecDeque<OperationSample>,
    aggregates: HashMap<String, OperationAggregate>,
}

impl PerfMonitor {
    // == Constructor ==
    /// Creates a monitor with the given alert thresholds.
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self {
            inner: RwLock::new(MonitorInner::default()),
            thresholds,
        }
    }

    // == Record ==
    /// Records one sample, updating the aggregate for its operation.
    ///
    /// Failed operations are logged here so a quiet caller still leaves a
    /// trace.
    pub async fn record(&self, sample: OperationSample) {
        if !sample.success {
            warn!(
                "operation {} failed after {}ms: {}",
                sample.operation,
                sample.duration_ms,
                sample.error_message.as_deref().unwrap_or("unknown error")
            );
        }

        let mut inner = self.inner.write().await;

        let aggregate = inner
            .aggregates
            .entry(sample.operation.clone())
            .or_default();
        aggregate.count += 1;
        if !sample.success {
            aggregate.failures += 1;
        }
        aggregate.total_duration_ms += sample.duration_ms;
        aggregate.max_duration_ms = aggregate.max_duration_ms.max(sample.duration_ms);

        inner.samples.push_back(sample);
        while inner.samples.len() > MAX_SAMPLES {
            inner.samples.pop_front();
        }
    }

    // == Alerts ==
    /// Operations currently past a threshold, in no particular order.
    pub async fn alerts(&self) -> Vec<Alert> {
        let inner = self.inner.read().await;

        let mut alerts = Vec::new();
        for (operation, aggregate) in &inner.aggregates {
            if aggregate.count < self.thresholds.min_samples {
                continue;
            }

            let average_ms = aggregate.average_ms();
            if average_ms > self.thresholds.slow_average_ms {
                alerts.push(Alert::SlowOperation {
                    operation: operation.clone(),
                    average_ms,
                    threshold_ms: self.thresholds.slow_average_ms,
                });
            }

            let failure_ratio = aggregate.failure_ratio();
            if failure_ratio > self.thresholds.error_ratio {
                alerts.push(Alert::HighErrorRate {
                    operation: operation.clone(),
                    failure_ratio,
                    threshold: self.thresholds.error_ratio,
                });
            }
        }
        alerts
    }

    // == Aggregates ==
    /// Snapshot of the per-operation aggregates.
    pub async fn aggregates(&self) -> HashMap<String, OperationAggregate> {
        self.inner.read().await.aggregates.clone()
    }

    // == Recent Samples ==
    /// The retained samples, oldest first.
    pub async fn recent_samples(&self) -> Vec<OperationSample> {
        self.inner.read().await.samples.iter().cloned().collect()
    }
}
