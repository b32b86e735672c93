/*!
 * MLFQ Simulator Library
 * Multilevel feedback queue scheduling core exposed as a library
 */

pub mod core;
pub mod monitor;
pub mod process;
pub mod queue;
pub mod sched;
pub mod shell;

// Re-exports
pub use crate::core::errors::{AdmissionError, AdmissionResult, CommandError};
pub use crate::core::types::{Pid, Tick};
pub use monitor::{init_tracing, Console, Reporter, SystemSnapshot};
pub use process::{Process, ProcessClass, ProcessInfo, ProcessState, ProcessTable};
pub use queue::{DynamicQueue, LevelSnapshot, QueueSnapshot, QueuedProcess};
pub use sched::stats::SchedStats;
pub use sched::wait::WaitingProcess;
pub use sched::{ProcessManager, ProcessManagerBuilder};
pub use shell::{Command, Interpreter, Origin, Request};
