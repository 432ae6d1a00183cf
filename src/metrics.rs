//! Metrics module - Stream latency histograms and lifecycle counters

use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::async_impl::StreamOutcome;

/// Significant figures kept by every histogram; hdrhistogram accepts 0..=5.
const SIGFIG: u8 = 3;

fn histogram() -> Arc<Mutex<Histogram<u64>>> {
    // Only fails for SIGFIG > 5.
    Arc::new(Mutex::new(
        Histogram::new(SIGFIG).expect("SIGFIG is a valid histogram precision"),
    ))
}

// ============================================================================
// STREAM METRICS - Shared across every stream task
// ============================================================================

#[derive(Clone)]
pub struct StreamMetrics {
    generation_hist: Arc<Mutex<Histogram<u64>>>,
    send_hist: Arc<Mutex<Histogram<u64>>>,
    streams_opened: Arc<AtomicU64>,
    streams_completed: Arc<AtomicU64>,
    streams_cancelled: Arc<AtomicU64>,
    consumer_errors: Arc<AtomicU64>,
    readings_emitted: Arc<AtomicU64>,
}

impl StreamMetrics {
    pub fn new() -> Self {
        Self {
            generation_hist: histogram(),
            send_hist: histogram(),
            streams_opened: Arc::new(AtomicU64::new(0)),
            streams_completed: Arc::new(AtomicU64::new(0)),
            streams_cancelled: Arc::new(AtomicU64::new(0)),
            consumer_errors: Arc::new(AtomicU64::new(0)),
            readings_emitted: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Counts a new stream and returns its 1-based id.
    pub fn record_opened(&self) -> u64 {
        self.streams_opened.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_generation(&self, duration: Duration) {
        self.generation_hist.lock().record(duration.as_micros() as u64).ok();
    }

    pub fn record_send(&self, duration: Duration) {
        self.send_hist.lock().record(duration.as_micros() as u64).ok();
        self.readings_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, outcome: &StreamOutcome) {
        let counter = match outcome {
            StreamOutcome::Completed { .. } => &self.streams_completed,
            StreamOutcome::Cancelled { .. } => &self.streams_cancelled,
            StreamOutcome::ConsumerError { .. } => &self.consumer_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> MetricsReport {
        let gen = self.generation_hist.lock();
        let send = self.send_hist.lock();

        MetricsReport {
            generation_p50_us: gen.value_at_quantile(0.5),
            generation_p99_us: gen.value_at_quantile(0.99),
            send_p50_us: send.value_at_quantile(0.5),
            send_p99_us: send.value_at_quantile(0.99),
            streams_opened: self.streams_opened.load(Ordering::Relaxed),
            streams_completed: self.streams_completed.load(Ordering::Relaxed),
            streams_cancelled: self.streams_cancelled.load(Ordering::Relaxed),
            consumer_errors: self.consumer_errors.load(Ordering::Relaxed),
            readings_emitted: self.readings_emitted.load(Ordering::Relaxed),
        }
    }
}

impl Default for StreamMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// METRICS REPORT - Summary statistics
// ============================================================================

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MetricsReport {
    pub generation_p50_us: u64,
    pub generation_p99_us: u64,
    pub send_p50_us: u64,
    pub send_p99_us: u64,
    pub streams_opened: u64,
    pub streams_completed: u64,
    pub streams_cancelled: u64,
    pub consumer_errors: u64,
    pub readings_emitted: u64,
}
