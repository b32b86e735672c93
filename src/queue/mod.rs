/*!
 * Dynamic Multilevel Queue
 * Priority levels with aging and size-bounded rebalancing
 */

mod level;
mod stack;

use crate::core::types::Pid;
use crate::process::types::{Process, ProcessClass};
use log::trace;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use stack::LevelStack;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// One queued process as seen by the reporting sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueuedProcess {
    pub pid: Pid,
    pub class: ProcessClass,
    pub promoted: bool,
}

/// Ordered view of one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LevelSnapshot {
    pub processes: Vec<QueuedProcess>,
}

/// Consistent copy of the whole queue, levels bottom to top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueSnapshot {
    pub levels: Vec<LevelSnapshot>,
}

impl QueueSnapshot {
    /// Size of the largest level, 0 when the queue is empty
    #[must_use]
    pub fn max_level_len(&self) -> usize {
        self.levels
            .iter()
            .map(|level| level.processes.len())
            .max()
            .unwrap_or(0)
    }

    /// Total processes across every level
    #[must_use]
    pub fn total(&self) -> usize {
        self.levels.iter().map(|level| level.processes.len()).sum()
    }
}

/// The multilevel feedback queue shared by producers and the dispatcher
///
/// Every public operation acquires the single internal lock exactly once per
/// call; the `LevelStack` helpers assume the lock is already held and never
/// lock again. Re-entrant acquisition of the non-reentrant mutex would
/// deadlock the calling thread, so internal passes (promotion, rebalance) are
/// only ever reached through a locked entry point.
pub struct DynamicQueue {
    inner: Mutex<LevelStack>,
    ready: Condvar,
    split_threshold: usize,
    promotions: AtomicU64,
    splits: AtomicU64,
}

impl DynamicQueue {
    /// Create a queue sized for `capacity` total processes
    ///
    /// The split threshold derives from the capacity as `capacity / 3`,
    /// clamped to at least 1 so a split always detaches a non-empty half.
    pub fn new(capacity: usize) -> Self {
        Self::with_threshold(capacity / 3)
    }

    /// Create a queue with an explicit split threshold
    pub fn with_threshold(split_threshold: usize) -> Self {
        let split_threshold = split_threshold.max(1);
        Self {
            inner: Mutex::new(LevelStack::new(split_threshold)),
            ready: Condvar::new(),
            split_threshold,
            promotions: AtomicU64::new(0),
            splits: AtomicU64::new(0),
        }
    }

    /// Append `process` to the level its class selects and wake one blocked
    /// dispatcher
    pub fn enqueue(&self, process: Process) {
        let mut stack = self.inner.lock();
        trace!("enqueue pid={} class={}", process.pid, process.class);
        stack.admit(process);
        let splits = stack.rebalance();
        drop(stack);
        self.splits.fetch_add(splits as u64, Ordering::Relaxed);
        self.ready.notify_one();
    }

    /// Remove and return the front process of the top level, blocking while
    /// the queue is empty
    ///
    /// There is no timeout here; cancellation is the caller's responsibility.
    pub fn dequeue(&self) -> Process {
        let mut stack = self.inner.lock();
        loop {
            if let Some(process) = self.take_locked(&mut stack) {
                return process;
            }
            self.ready.wait(&mut stack);
        }
    }

    /// Like [`DynamicQueue::dequeue`], giving up after `timeout`
    ///
    /// The scheduler loop uses this to stay responsive to its stop flag and
    /// to idle ticks while the wait set holds the only remaining work.
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<Process> {
        let deadline = Instant::now() + timeout;
        let mut stack = self.inner.lock();
        loop {
            if let Some(process) = self.take_locked(&mut stack) {
                return Some(process);
            }
            if self.ready.wait_until(&mut stack, deadline).timed_out() {
                return self.take_locked(&mut stack);
            }
        }
    }

    /// Standalone aging pass over the intermediate levels
    pub fn promote(&self) {
        let mut stack = self.inner.lock();
        let promoted = stack.promote();
        let splits = stack.rebalance();
        drop(stack);
        self.promotions.fetch_add(promoted as u64, Ordering::Relaxed);
        self.splits.fetch_add(splits as u64, Ordering::Relaxed);
    }

    // Dispatch plus the passes that follow it, under the already-held lock.
    fn take_locked(&self, stack: &mut LevelStack) -> Option<Process> {
        let process = stack.dispatch()?;
        let promoted = stack.promote();
        let splits = stack.rebalance();
        self.promotions.fetch_add(promoted as u64, Ordering::Relaxed);
        self.splits.fetch_add(splits as u64, Ordering::Relaxed);
        trace!(
            "dispatch pid={} ({} promoted, {} splits)",
            process.pid,
            promoted,
            splits
        );
        Some(process)
    }

    /// Consistent copy for the reporting sink
    pub fn snapshot(&self) -> QueueSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Number of levels currently linked
    pub fn level_count(&self) -> usize {
        self.inner.lock().level_count()
    }

    pub fn split_threshold(&self) -> usize {
        self.split_threshold
    }

    /// Total processes moved by promotion passes so far
    pub fn promotion_count(&self) -> u64 {
        self.promotions.load(Ordering::Relaxed)
    }

    /// Total level splits so far
    pub fn split_count(&self) -> u64 {
        self.splits.load(Ordering::Relaxed)
    }
}
