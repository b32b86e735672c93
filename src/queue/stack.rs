/*!
 * Level Stack
 * Owned storage for the priority levels of the dynamic queue
 *
 * Every method assumes the caller already holds the queue lock; nothing in
 * here synchronizes. Levels are stored bottom (index 0) to top (last index),
 * and an empty level is unlinked the moment it drains, so every stored level
 * is non-empty between operations.
 */

use super::level::Level;
use super::{LevelSnapshot, QueueSnapshot, QueuedProcess};
use crate::process::types::Process;
use log::trace;

#[derive(Debug)]
pub(super) struct LevelStack {
    levels: Vec<Level>,
    len: usize,
    split_threshold: usize,
}

impl LevelStack {
    pub fn new(split_threshold: usize) -> Self {
        Self {
            levels: Vec::new(),
            len: 0,
            split_threshold,
        }
    }

    /// Place `process` at the tail of the level its class selects
    ///
    /// Foreground joins the top level, background the bottom one. The first
    /// admission into an empty stack creates the sole level, which is both.
    pub fn admit(&mut self, process: Process) {
        if self.levels.is_empty() {
            self.levels.push(Level::new());
        }
        let level = if process.class.is_foreground() {
            self.levels.last_mut()
        } else {
            self.levels.first_mut()
        };
        if let Some(level) = level {
            level.push_back(process);
            self.len += 1;
        }
    }

    /// Remove the front process of the top level, unlinking the level if it
    /// drains
    pub fn dispatch(&mut self) -> Option<Process> {
        let top = self.levels.last_mut()?;
        let process = top.pop_front()?;
        if top.is_empty() {
            self.levels.pop();
        }
        self.len -= 1;
        Some(process)
    }

    /// Aging pass: move the front process of every level strictly below top
    /// to the top's tail, marking it promoted
    ///
    /// Levels drained by the walk are unlinked. Returns the number of
    /// processes moved.
    pub fn promote(&mut self) -> usize {
        if self.levels.len() < 2 {
            return 0;
        }
        let top = self.levels.len() - 1;
        let mut moved = Vec::new();
        for level in &mut self.levels[..top] {
            if let Some(mut process) = level.pop_front() {
                process.promoted = true;
                moved.push(process);
            }
        }
        self.levels.retain(|level| !level.is_empty());
        let count = moved.len();
        if let Some(top) = self.levels.last_mut() {
            for process in moved {
                trace!("promoted pid={} to top level", process.pid);
                top.push_back(process);
            }
        }
        count
    }

    /// Rebalancing pass: split any level whose size exceeds the threshold
    ///
    /// The front half (by count, order preserved) becomes a new level
    /// directly above the split one, so the earliest-arrived half gains
    /// strictly higher priority. The retained half is re-checked before the
    /// scan advances, and a level created by a split is checked in turn, so
    /// the cascade settles with every level at or below the threshold.
    /// Undersized levels are never merged. Returns the number of splits.
    pub fn rebalance(&mut self) -> usize {
        let mut splits = 0;
        let mut idx = 0;
        while idx < self.levels.len() {
            if self.levels[idx].len() > self.split_threshold {
                let half = self.levels[idx].len() / 2;
                let front = self.levels[idx].split_front(half);
                trace!(
                    "split level {}: {} processes promoted a tier",
                    idx,
                    front.len()
                );
                self.levels.insert(idx + 1, Level::from_front(front));
                splits += 1;
            } else {
                idx += 1;
            }
        }
        splits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Ordered view of every level, bottom to top
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            levels: self
                .levels
                .iter()
                .map(|level| LevelSnapshot {
                    processes: level
                        .iter()
                        .map(|p| QueuedProcess {
                            pid: p.pid,
                            class: p.class,
                            promoted: p.promoted,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
