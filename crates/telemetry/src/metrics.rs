//! Internal metrics collection.
//!
//! Collects counters in-memory; callers take snapshots when they want to
//! report them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 2ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms
    buckets: [AtomicU64; 8],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 8] = [1, 2, 5, 10, 25, 50, 100, 250];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[7].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the metering engine.
#[derive(Debug, Default)]
pub struct Metrics {
    // Evaluation metrics
    pub evaluations: Counter,
    pub rules_evaluated: Counter,
    pub rules_skipped: Counter,
    pub rules_tripped: Counter,
    pub views_counted: Counter,
    pub repeat_views: Counter,
    pub window_resets: Counter,

    // Store metrics
    pub store_loads: Counter,
    pub store_saves: Counter,
    pub store_errors: Counter,
    pub cache_clears: Counter,

    // Latency histograms
    pub evaluation_latency_ms: Histogram,

    // Gauges
    pub active_rules: Gauge,
    pub tracked_rules: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            evaluations: self.evaluations.get(),
            rules_evaluated: self.rules_evaluated.get(),
            rules_skipped: self.rules_skipped.get(),
            rules_tripped: self.rules_tripped.get(),
            views_counted: self.views_counted.get(),
            repeat_views: self.repeat_views.get(),
            window_resets: self.window_resets.get(),
            store_loads: self.store_loads.get(),
            store_saves: self.store_saves.get(),
            store_errors: self.store_errors.get(),
            cache_clears: self.cache_clears.get(),
            evaluation_latency_mean_ms: self.evaluation_latency_ms.mean(),
            active_rules: self.active_rules.get(),
            tracked_rules: self.tracked_rules.get(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub evaluations: u64,
    pub rules_evaluated: u64,
    pub rules_skipped: u64,
    pub rules_tripped: u64,
    pub views_counted: u64,
    pub repeat_views: u64,
    pub window_resets: u64,
    pub store_loads: u64,
    pub store_saves: u64,
    pub store_errors: u64,
    pub cache_clears: u64,
    pub evaluation_latency_mean_ms: f64,
    pub active_rules: u64,
    pub tracked_rules: u64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
