/*!
 * Process Manager
 * Owns the dynamic queue, the wait set, and the simulated clock
 */

pub mod stats;
pub mod wait;

use crate::core::errors::{AdmissionError, AdmissionResult};
use crate::core::types::{Pid, Tick};
use crate::monitor::Console;
use crate::process::table::ProcessTable;
use crate::process::types::{Process, ProcessClass, ProcessState};
use crate::queue::{DynamicQueue, QueueSnapshot};
use log::{debug, info, trace};
use parking_lot::Mutex;
use stats::{AtomicSchedStats, SchedStats};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use wait::{WaitSet, WaitingProcess};

const DEFAULT_CAPACITY: usize = 10;
const DEFAULT_POLL: Duration = Duration::from_millis(10);

/// Builder for [`ProcessManager`]
pub struct ProcessManagerBuilder {
    capacity: usize,
    quantum: Duration,
    poll: Duration,
    console: Option<Arc<Console>>,
}

impl ProcessManagerBuilder {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            quantum: Duration::ZERO,
            poll: DEFAULT_POLL,
            console: None,
        }
    }

    /// Expected total process population; the split threshold derives from it
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Real-time delay per dispatched quantum; zero keeps the simulation
    /// purely logical (simulated time still advances by exactly 1)
    pub fn with_quantum(mut self, quantum: Duration) -> Self {
        self.quantum = quantum;
        self
    }

    /// How long one loop iteration waits for ready work before checking the
    /// stop flag and the wait set
    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    /// Console gate the dispatch report is written through
    pub fn with_console(mut self, console: Arc<Console>) -> Self {
        self.console = Some(console);
        self
    }

    pub fn build(self) -> ProcessManager {
        info!(
            "process manager initialized: capacity={}, quantum={:?}",
            self.capacity, self.quantum
        );
        ProcessManager {
            queue: DynamicQueue::new(self.capacity),
            waiting: Mutex::new(WaitSet::new()),
            clock: AtomicU64::new(0),
            next_pid: AtomicU32::new(1),
            stats: AtomicSchedStats::new(),
            table: ProcessTable::new(),
            sealed: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            quantum: self.quantum,
            poll: self.poll,
            console: self.console,
        }
    }
}

impl Default for ProcessManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The scheduler: admission, dispatch, waiting, and re-admission
///
/// Shared between the loop thread, the admission sources, and the reporting
/// sink; every public method takes `&self`.
pub struct ProcessManager {
    queue: DynamicQueue,
    waiting: Mutex<WaitSet>,
    clock: AtomicU64,
    next_pid: AtomicU32,
    stats: AtomicSchedStats,
    table: ProcessTable,
    sealed: AtomicBool,
    stopped: AtomicBool,
    quantum: Duration,
    poll: Duration,
    console: Option<Arc<Console>>,
}

impl ProcessManager {
    pub fn builder() -> ProcessManagerBuilder {
        ProcessManagerBuilder::new()
    }

    pub fn new(capacity: usize) -> Self {
        Self::builder().with_capacity(capacity).build()
    }

    /// Admit a new process under `class`; `duration` is its total quanta
    pub fn admit(&self, class: ProcessClass, duration: u32) -> AdmissionResult<Pid> {
        if duration == 0 {
            return Err(AdmissionError::InvalidDuration(duration));
        }
        if self.sealed.load(Ordering::Acquire) {
            return Err(AdmissionError::Sealed);
        }
        let pid = self.next_pid.fetch_add(1, Ordering::Relaxed);
        let process = Process::new(pid, class, duration);
        self.table.insert(&process);
        self.stats.inc_admitted();
        info!("admitted pid={} class={} duration={}", pid, class, duration);
        self.queue.enqueue(process);
        Ok(pid)
    }

    /// Current simulated time
    pub fn now(&self) -> Tick {
        self.clock.load(Ordering::Relaxed)
    }

    /// Ready plus waiting population (excludes a process mid-dispatch)
    pub fn current_load(&self) -> usize {
        self.queue.len() + self.waiting.lock().len()
    }

    pub fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.waiting.lock().is_empty()
    }

    /// Declare the admission sources finished; `run` may then terminate on
    /// the drained condition
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
        info!("admissions sealed");
    }

    /// Cooperative shutdown, checked once per loop iteration
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        info!("scheduler stop requested");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// True once the loop has nothing left to do: stopped, or sealed and
    /// fully drained
    pub fn is_finished(&self) -> bool {
        self.is_stopped() || (self.sealed.load(Ordering::Acquire) && self.is_drained())
    }

    /// Drive the scheduler until sealed-and-drained or stopped
    ///
    /// One iteration dispatches at most one quantum. When the queue stays
    /// empty for a poll interval but the wait set holds work, the tick is an
    /// idle one: the clock still advances by exactly 1 so parked processes
    /// become eligible again.
    pub fn run(&self) {
        info!("scheduler loop started (quantum={:?})", self.quantum);
        loop {
            if self.is_stopped() {
                break;
            }
            if self.sealed.load(Ordering::Acquire) && self.is_drained() {
                break;
            }
            match self.queue.dequeue_timeout(self.poll) {
                Some(process) => self.dispatch(process),
                None => self.idle_tick(),
            }
        }
        info!(
            "scheduler loop finished at tick {} ({} completed)",
            self.now(),
            self.stats().completed
        );
    }

    // Run one quantum of the dispatched process, then park or retire it.
    fn dispatch(&self, mut process: Process) {
        self.table.on_dispatch(&process);
        self.report_running(&process);
        if !self.quantum.is_zero() {
            thread::sleep(self.quantum);
        }

        let now = self.clock.fetch_add(1, Ordering::Relaxed) + 1;
        process.remaining -= 1;
        self.stats.inc_dispatched();

        if process.is_finished() {
            info!("pid={} finished at tick {}", process.pid, now);
            self.table.set_state(process.pid, ProcessState::Terminated);
            self.stats.inc_completed();
            // the process is dropped here and never re-enters the system
        } else {
            let resume_at = now + 1;
            trace!(
                "pid={} parked until tick {} (remaining={})",
                process.pid,
                resume_at,
                process.remaining
            );
            self.table.set_state(process.pid, ProcessState::Waiting);
            self.waiting.lock().park(process, resume_at);
        }

        self.wake_expired();
    }

    // A poll elapsed with no ready work; advance time only if the wait set
    // holds the processes the clock must release.
    fn idle_tick(&self) {
        if self.waiting.lock().is_empty() {
            return;
        }
        let now = self.clock.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("idle tick -> {}", now);
        self.stats.inc_idle_ticks();
        self.wake_expired();
    }

    /// Re-admit every waiter whose resume tick has elapsed, in resume order
    pub fn wake_expired(&self) {
        let now = self.now();
        loop {
            let process = self.waiting.lock().pop_expired(now);
            match process {
                Some(process) => {
                    debug!("pid={} woke at tick {}", process.pid, now);
                    self.table.set_state(process.pid, ProcessState::Ready);
                    self.stats.inc_wakeups();
                    self.queue.enqueue(process);
                }
                None => break,
            }
        }
    }

    fn report_running(&self, process: &Process) {
        debug!(
            "running pid={} class={} remaining={}",
            process.pid, process.class, process.remaining
        );
        if let Some(console) = &self.console {
            console.line(format_args!(
                "Running: [{}{}]",
                process.pid,
                process.class.tag()
            ));
        }
    }

    /// Consistent queue view for the reporting sink
    pub fn queue_snapshot(&self) -> QueueSnapshot {
        self.queue.snapshot()
    }

    /// Ordered wait-set view for the reporting sink
    pub fn wait_snapshot(&self) -> Vec<WaitingProcess> {
        self.waiting.lock().snapshot()
    }

    pub fn stats(&self) -> SchedStats {
        self.stats.snapshot(
            self.queue.promotion_count(),
            self.queue.split_count(),
            self.now(),
        )
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    pub fn queue(&self) -> &DynamicQueue {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_manager() -> ProcessManager {
        ProcessManager::builder()
            .with_capacity(10)
            .with_poll_interval(Duration::from_millis(1))
            .build()
    }

    #[test]
    fn test_admit_rejects_zero_duration() {
        let manager = quick_manager();
        assert_eq!(
            manager.admit(ProcessClass::Foreground, 0),
            Err(AdmissionError::InvalidDuration(0))
        );
        assert_eq!(manager.current_load(), 0);
    }

    #[test]
    fn test_admit_rejects_after_seal() {
        let manager = quick_manager();
        manager.seal();
        assert_eq!(
            manager.admit(ProcessClass::Background, 2),
            Err(AdmissionError::Sealed)
        );
    }

    #[test]
    fn test_admit_assigns_fresh_pids() {
        let manager = quick_manager();
        let a = manager.admit(ProcessClass::Foreground, 1).unwrap();
        let b = manager.admit(ProcessClass::Background, 1).unwrap();
        assert_ne!(a, b);
        assert_eq!(manager.current_load(), 2);
    }

    #[test]
    fn test_run_drains_sealed_workload() {
        let manager = quick_manager();
        manager.admit(ProcessClass::Foreground, 3).unwrap();
        manager.admit(ProcessClass::Background, 1).unwrap();
        manager.seal();

        manager.run();

        let stats = manager.stats();
        assert_eq!(stats.admitted, 2);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.dispatched, 4);
        assert!(manager.is_drained());
        assert!(manager.is_finished());
    }

    #[test]
    fn test_single_process_waits_one_tick_between_quanta() {
        let manager = quick_manager();
        manager.admit(ProcessClass::Foreground, 2).unwrap();
        manager.seal();

        manager.run();

        let stats = manager.stats();
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.dispatched, 2);
        // the lone process parks after its first quantum, so the clock must
        // idle past its resume tick before the second dispatch
        assert!(stats.idle_ticks >= 1);
        assert_eq!(stats.wakeups, 1);
    }

    #[test]
    fn test_terminated_processes_stay_in_table() {
        let manager = quick_manager();
        let pid = manager.admit(ProcessClass::Foreground, 1).unwrap();
        manager.seal();
        manager.run();

        let info = manager.table().get(pid).unwrap();
        assert!(info.is_terminated());
    }

    #[test]
    fn test_stop_breaks_the_loop() {
        let manager = quick_manager();
        manager.stop();
        // never seals, but the stop flag alone must end the loop
        manager.run();
        assert!(manager.is_stopped());
    }
}
