/*!
 * Process Types
 * The schedulable unit and the records mirrored into the process table
 */

use crate::core::types::{Pid, Tick};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Admission class of a process; fixed for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessClass {
    /// Interactive work, admitted at the top level
    Foreground,
    /// Batch work, admitted at the bottom level
    Background,
}

impl ProcessClass {
    /// Single-letter tag used by the reporting sink
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> char {
        match self {
            ProcessClass::Foreground => 'F',
            ProcessClass::Background => 'B',
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_foreground(&self) -> bool {
        matches!(self, ProcessClass::Foreground)
    }
}

impl fmt::Display for ProcessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Lifecycle state mirrored into the process table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// In a queue level, eligible for dispatch
    Ready,
    /// Holding the dispatch slot for one quantum
    Running,
    /// Parked in the wait set until its resume tick
    Waiting,
    /// Completed; never re-enters the system
    Terminated,
}

/// The schedulable unit
///
/// Owned by exactly one of the dynamic queue, the wait set, or the dispatch
/// slot at any instant; every transition between those owners is a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    pub pid: Pid,
    pub class: ProcessClass,
    /// Quanta left until completion
    pub remaining: u32,
    /// Tick after which a waiting process is eligible for re-admission;
    /// `None` until the process first enters the wait set
    pub resume_at: Option<Tick>,
    /// Set the first time the promotion pass moves the process; never cleared
    pub promoted: bool,
}

impl Process {
    #[inline]
    #[must_use]
    pub fn new(pid: Pid, class: ProcessClass, duration: u32) -> Self {
        Self {
            pid,
            class,
            remaining: duration,
            resume_at: None,
            promoted: false,
        }
    }

    /// Check if the process has consumed all of its quanta
    #[inline(always)]
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

/// Observability record kept in the process table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    pub class: ProcessClass,
    pub state: ProcessState,
    pub promoted: bool,
}

impl ProcessInfo {
    #[inline]
    #[must_use]
    pub fn new(process: &Process) -> Self {
        Self {
            pid: process.pid,
            class: process.class,
            state: ProcessState::Ready,
            promoted: process.promoted,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, ProcessState::Terminated)
    }
}
