/*!
 * Scheduler Statistics
 * Lock-free atomic counters for hot-path updates, snapshot for monitoring
 */

use crate::core::types::Tick;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic scheduler counters
///
/// All updates use relaxed ordering; individual values are accurate but a
/// snapshot taken under concurrent updates may not be mutually consistent,
/// which is acceptable for monitoring.
#[derive(Debug, Default)]
pub struct AtomicSchedStats {
    admitted: AtomicU64,
    completed: AtomicU64,
    dispatched: AtomicU64,
    idle_ticks: AtomicU64,
    wakeups: AtomicU64,
}

impl AtomicSchedStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn inc_admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_idle_ticks(&self) {
        self.idle_ticks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_wakeups(&self) {
        self.wakeups.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot combined with the queue-side counters and the clock
    pub fn snapshot(&self, promotions: u64, splits: u64, clock: Tick) -> SchedStats {
        SchedStats {
            admitted: self.admitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            idle_ticks: self.idle_ticks.load(Ordering::Relaxed),
            wakeups: self.wakeups.load(Ordering::Relaxed),
            promotions,
            splits,
            clock,
        }
    }
}

/// Scheduler statistics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedStats {
    pub admitted: u64,
    pub completed: u64,
    /// Quanta executed
    pub dispatched: u64,
    /// Ticks spent with every runnable process parked in the wait set
    pub idle_ticks: u64,
    /// Re-admissions out of the wait set
    pub wakeups: u64,
    pub promotions: u64,
    pub splits: u64,
    pub clock: Tick,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = AtomicSchedStats::new();
        stats.inc_admitted();
        stats.inc_admitted();
        stats.inc_dispatched();
        stats.inc_completed();

        let snap = stats.snapshot(4, 2, 11);
        assert_eq!(snap.admitted, 2);
        assert_eq!(snap.dispatched, 1);
        assert_eq!(snap.completed, 1);
        assert_eq!(snap.promotions, 4);
        assert_eq!(snap.splits, 2);
        assert_eq!(snap.clock, 11);
    }
}
