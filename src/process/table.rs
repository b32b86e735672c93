/*!
 * Process Table
 * Concurrent registry mirroring every lifecycle transition
 */

use super::types::{Process, ProcessInfo, ProcessState};
use crate::core::types::Pid;
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent pid -> info registry
///
/// The table is observability only: scheduling decisions never consult it.
/// Terminated processes keep their record so a completed run can still be
/// inspected.
#[derive(Clone)]
pub struct ProcessTable {
    entries: Arc<DashMap<Pid, ProcessInfo, RandomState>>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::with_hasher(RandomState::new())),
        }
    }

    /// Register a freshly admitted process in `Ready` state
    pub fn insert(&self, process: &Process) {
        self.entries.insert(process.pid, ProcessInfo::new(process));
    }

    /// Record a state transition for `pid`; unknown pids are ignored
    pub fn set_state(&self, pid: Pid, state: ProcessState) {
        if let Some(mut info) = self.entries.get_mut(&pid) {
            info.state = state;
        }
    }

    /// Sync the state and promotion flag from a dispatched process
    pub fn on_dispatch(&self, process: &Process) {
        if let Some(mut info) = self.entries.get_mut(&process.pid) {
            info.state = ProcessState::Running;
            info.promoted = process.promoted;
        }
    }

    pub fn get(&self, pid: Pid) -> Option<ProcessInfo> {
        self.entries.get(&pid).map(|info| info.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All records, ordered by pid
    pub fn list(&self) -> Vec<ProcessInfo> {
        let mut all: Vec<ProcessInfo> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|info| info.pid);
        all
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::ProcessClass;

    #[test]
    fn test_insert_and_transition() {
        let table = ProcessTable::new();
        let p = Process::new(1, ProcessClass::Foreground, 3);
        table.insert(&p);

        let info = table.get(1).unwrap();
        assert_eq!(info.state, ProcessState::Ready);

        table.set_state(1, ProcessState::Terminated);
        assert!(table.get(1).unwrap().is_terminated());
    }

    #[test]
    fn test_on_dispatch_syncs_promotion() {
        let table = ProcessTable::new();
        let mut p = Process::new(2, ProcessClass::Background, 2);
        table.insert(&p);

        p.promoted = true;
        table.on_dispatch(&p);

        let info = table.get(2).unwrap();
        assert_eq!(info.state, ProcessState::Running);
        assert!(info.promoted);
    }

    #[test]
    fn test_unknown_pid_is_ignored() {
        let table = ProcessTable::new();
        table.set_state(99, ProcessState::Running);
        assert!(table.get(99).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_list_is_ordered() {
        let table = ProcessTable::new();
        for pid in [3u32, 1, 2] {
            table.insert(&Process::new(pid, ProcessClass::Foreground, 1));
        }
        let pids: Vec<_> = table.list().into_iter().map(|info| info.pid).collect();
        assert_eq!(pids, vec![1, 2, 3]);
    }
}
