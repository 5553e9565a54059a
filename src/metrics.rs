// Metrics hooks for the overlap engine.
//
// Callers install a global `MatchMetrics` implementation via
// [`set_match_metrics`], then `OverlapEngine` reports per-scan latency and
// hit/skip counts for each call to `rank`. This keeps instrumentation
// decoupled from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::calibrate::CalibrationPolicy;

/// Metrics observer for corpus scans.
pub trait MatchMetrics: Send + Sync {
    /// Record the outcome of one ranking pass.
    ///
    /// `policy` is the calibration policy in effect, `latency` the
    /// wall-clock duration of the scan, `scored` the number of candidates
    /// that produced a calibrated score, and `skipped` the number excluded
    /// for data-shape problems.
    fn record_scan(
        &self,
        policy: &CalibrationPolicy,
        latency: Duration,
        scored: usize,
        skipped: usize,
    );
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
///
/// This is typically called once during service startup so all
/// `OverlapEngine` instances share the same metrics backend.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("match metrics lock poisoned");
    *guard = recorder;
}
