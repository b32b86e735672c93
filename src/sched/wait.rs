/*!
 * Wait Set
 * Processes that ran a quantum but did not finish, ordered by resume tick
 */

use crate::core::types::{Pid, Tick};
use crate::process::types::{Process, ProcessClass};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One waiting process as seen by the reporting sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WaitingProcess {
    pub pid: Pid,
    pub class: ProcessClass,
    pub remaining: u32,
    pub resume_at: Tick,
}

/// Heap entry; `Ord` is inverted so the earliest (resume_at, seq) pops first
#[derive(Debug, Clone)]
struct WaitEntry {
    resume_at: Tick,
    seq: u64,
    process: Process,
}

impl PartialEq for WaitEntry {
    fn eq(&self, other: &Self) -> bool {
        self.resume_at == other.resume_at && self.seq == other.seq
    }
}

impl Eq for WaitEntry {}

impl Ord for WaitEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert to pop the earliest entry first,
        // with insertion order breaking ties
        other
            .resume_at
            .cmp(&self.resume_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for WaitEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-ordered wait set; the earliest resume tick is peekable in O(1)
#[derive(Debug, Default)]
pub struct WaitSet {
    heap: BinaryHeap<WaitEntry>,
    next_seq: u64,
}

impl WaitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `process` until after `resume_at`
    pub fn park(&mut self, mut process: Process, resume_at: Tick) {
        process.resume_at = Some(resume_at);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(WaitEntry {
            resume_at,
            seq,
            process,
        });
    }

    /// Earliest resume tick, if any
    #[must_use]
    pub fn next_resume(&self) -> Option<Tick> {
        self.heap.peek().map(|entry| entry.resume_at)
    }

    /// Remove and return the earliest process whose resume tick has passed
    pub fn pop_expired(&mut self, now: Tick) -> Option<Process> {
        if self.next_resume()? <= now {
            self.heap.pop().map(|entry| entry.process)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Ordered view, earliest resume tick first
    pub fn snapshot(&self) -> Vec<WaitingProcess> {
        let mut entries: Vec<&WaitEntry> = self.heap.iter().collect();
        entries.sort_by_key(|entry| (entry.resume_at, entry.seq));
        entries
            .into_iter()
            .map(|entry| WaitingProcess {
                pid: entry.process.pid,
                class: entry.process.class,
                remaining: entry.process.remaining,
                resume_at: entry.resume_at,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(pid: u32) -> Process {
        Process::new(pid, ProcessClass::Foreground, 3)
    }

    #[test]
    fn test_pop_in_resume_order() {
        let mut waiting = WaitSet::new();
        waiting.park(proc(1), 5);
        waiting.park(proc(2), 2);
        waiting.park(proc(3), 9);

        assert_eq!(waiting.next_resume(), Some(2));
        assert_eq!(waiting.pop_expired(9).map(|p| p.pid), Some(2));
        assert_eq!(waiting.pop_expired(9).map(|p| p.pid), Some(1));
        assert_eq!(waiting.pop_expired(9).map(|p| p.pid), Some(3));
        assert!(waiting.is_empty());
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let mut waiting = WaitSet::new();
        waiting.park(proc(10), 4);
        waiting.park(proc(11), 4);
        waiting.park(proc(12), 4);

        let order: Vec<u32> = std::iter::from_fn(|| waiting.pop_expired(4))
            .map(|p| p.pid)
            .collect();
        assert_eq!(order, vec![10, 11, 12]);
    }

    #[test]
    fn test_not_expired_stays_parked() {
        let mut waiting = WaitSet::new();
        waiting.park(proc(1), 7);
        assert!(waiting.pop_expired(6).is_none());
        assert_eq!(waiting.len(), 1);
        assert!(waiting.pop_expired(7).is_some());
    }

    #[test]
    fn test_park_records_resume_tick() {
        let mut waiting = WaitSet::new();
        waiting.park(proc(1), 3);
        let process = waiting.pop_expired(3).unwrap();
        assert_eq!(process.resume_at, Some(3));
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let mut waiting = WaitSet::new();
        waiting.park(proc(1), 8);
        waiting.park(proc(2), 3);
        waiting.park(proc(3), 8);

        let pids: Vec<u32> = waiting.snapshot().iter().map(|w| w.pid).collect();
        assert_eq!(pids, vec![2, 1, 3]);
    }
}
