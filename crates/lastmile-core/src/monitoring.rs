//! External-failure observations.
//!
//! Connectors report every call that ends as service-unavailable so operators
//! can alert on a dying provider independently of what the planner does with
//! the error.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Sink for external-failure observations.
pub trait FailureRecorder: Send + Sync {
    fn record_external_failure(&self, system_id: &str, reason: &str);
}

/// Emits one `warn` event per observation under the `lastmile::external_failure` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureRecorder;

impl FailureRecorder for TracingFailureRecorder {
    fn record_external_failure(&self, system_id: &str, reason: &str) {
        warn!(
            target: "lastmile::external_failure",
            system_id,
            reason,
            "external street network failure"
        );
    }
}

/// Keeps per-reason counters, keyed by `(system_id, reason)`.
#[derive(Debug, Default)]
pub struct CountingFailureRecorder {
    counts: Mutex<BTreeMap<(String, String), u64>>,
}

impl CountingFailureRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, system_id: &str, reason: &str) -> u64 {
        self.lock()
            .get(&(system_id.to_owned(), reason.to_owned()))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.lock().values().sum()
    }

    // Each update is a single increment, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<(String, String), u64>> {
        self.counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FailureRecorder for CountingFailureRecorder {
    fn record_external_failure(&self, system_id: &str, reason: &str) {
        TracingFailureRecorder.record_external_failure(system_id, reason);
        *self
            .lock()
            .entry((system_id.to_owned(), reason.to_owned()))
            .or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_observations_per_reason() {
        let recorder = CountingFailureRecorder::new();
        recorder.record_external_failure("geovelo", "timeout");
        recorder.record_external_failure("geovelo", "timeout");
        recorder.record_external_failure("geovelo", "circuit breaker open");

        assert_eq!(recorder.count("geovelo", "timeout"), 2);
        assert_eq!(recorder.count("geovelo", "circuit breaker open"), 1);
        assert_eq!(recorder.count("other", "timeout"), 0);
        assert_eq!(recorder.total(), 3);
    }

    #[test]
    fn keeps_counting_after_a_panicking_holder() {
        let recorder = std::sync::Arc::new(CountingFailureRecorder::new());
        recorder.record_external_failure("geovelo", "timeout");

        let holder = std::sync::Arc::clone(&recorder);
        let outcome = std::thread::spawn(move || {
            let _guard = holder.counts.lock().expect("first lock");
            panic!("holder panicked");
        })
        .join();
        assert!(outcome.is_err());
        assert!(recorder.counts.is_poisoned());

        recorder.record_external_failure("geovelo", "timeout");
        assert_eq!(recorder.count("geovelo", "timeout"), 2);
        assert_eq!(recorder.total(), 2);
    }
}
