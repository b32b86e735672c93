/*!
 * Dynamic Queue Property Tests
 * Randomized checks of the queue invariants: FIFO, bounded levels,
 * conservation
 */

use mlfq_sim::{DynamicQueue, Process, ProcessClass};
use proptest::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
enum Op {
    EnqueueFg,
    EnqueueBg,
    Dequeue,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::EnqueueFg),
        2 => Just(Op::EnqueueBg),
        1 => Just(Op::Dequeue),
    ]
}

proptest! {
    /// Every level stays at or below the split threshold after any settled
    /// operation, and no process is ever lost or duplicated.
    #[test]
    fn prop_levels_bounded_and_conserved(
        ops in proptest::collection::vec(op_strategy(), 1..200),
        threshold in 1usize..6,
    ) {
        let queue = DynamicQueue::with_threshold(threshold);
        let mut next_pid = 1u32;
        let mut live = 0usize;
        let mut admitted = Vec::new();
        let mut dispatched = Vec::new();

        for op in ops {
            match op {
                Op::EnqueueFg | Op::EnqueueBg => {
                    let class = if matches!(op, Op::EnqueueFg) {
                        ProcessClass::Foreground
                    } else {
                        ProcessClass::Background
                    };
                    queue.enqueue(Process::new(next_pid, class, 1));
                    admitted.push(next_pid);
                    next_pid += 1;
                    live += 1;
                }
                Op::Dequeue => {
                    if live > 0 {
                        dispatched.push(queue.dequeue().pid);
                        live -= 1;
                    }
                }
            }
            prop_assert!(queue.snapshot().max_level_len() <= threshold);
            prop_assert_eq!(queue.len(), live);
            prop_assert_eq!(queue.snapshot().total(), live);
        }

        while let Some(process) = queue.dequeue_timeout(Duration::ZERO) {
            dispatched.push(process.pid);
        }
        dispatched.sort_unstable();
        admitted.sort_unstable();
        prop_assert_eq!(dispatched, admitted);
    }

    /// With a threshold large enough to prevent splits, foreground traffic
    /// is dispatched in exact admission order.
    #[test]
    fn prop_fifo_when_no_split_occurs(count in 1u32..40) {
        let queue = DynamicQueue::with_threshold(64);
        for pid in 1..=count {
            queue.enqueue(Process::new(pid, ProcessClass::Foreground, 1));
        }
        prop_assert_eq!(queue.level_count(), 1);
        for pid in 1..=count {
            prop_assert_eq!(queue.dequeue().pid, pid);
        }
        prop_assert!(queue.is_empty());
    }
}

/// A process parked in a non-top level reaches the top after at most one
/// promotion pass per intermediate level, independent of population.
#[test]
fn test_promotion_bounds_starvation_by_level_count() {
    let queue = DynamicQueue::with_threshold(2);
    for pid in 1..=9 {
        queue.enqueue(Process::new(pid, ProcessClass::Foreground, 1));
    }
    let levels_below_top = queue.level_count() - 1;

    // the bottom-level front must surface within one pass per level below
    // the top, even though eight other processes are queued
    let starved = queue
        .snapshot()
        .levels
        .first()
        .unwrap()
        .processes
        .first()
        .unwrap()
        .pid;
    for _ in 0..levels_below_top {
        queue.promote();
    }
    let snapshot = queue.snapshot();
    let top = snapshot.levels.last().unwrap();
    assert!(
        top.processes.iter().any(|p| p.pid == starved && p.promoted),
        "pid {starved} should have been promoted into the top level"
    );
}
