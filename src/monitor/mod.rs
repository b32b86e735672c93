/*!
 * Monitoring
 * Console gate, periodic snapshot reporter, and tracing initialization
 */

use crate::core::types::Tick;
use crate::queue::QueueSnapshot;
use crate::sched::wait::WaitingProcess;
use crate::sched::ProcessManager;
use log::warn;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Serialized access to the terminal
///
/// The one synchronization object for human-facing output, owned by the
/// components that produce it (the reporter and the shell interpreter).
/// Diagnostic logging goes through `tracing` instead.
pub struct Console {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Console {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Route output elsewhere (tests capture it through this)
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(writer),
        }
    }

    /// Write one line; errors are dropped, the terminal may be gone
    pub fn line(&self, args: fmt::Arguments<'_>) {
        let mut out = self.out.lock();
        let _ = out.write_fmt(args);
        let _ = out.write_all(b"\n");
        let _ = out.flush();
    }

    /// Write without a trailing newline (the shell prompt)
    pub fn prompt(&self, text: &str) {
        let mut out = self.out.lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// Combined queue and wait-set view at one tick
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SystemSnapshot {
    pub tick: Tick,
    pub queue: QueueSnapshot,
    pub waiting: Vec<WaitingProcess>,
}

/// Periodic reporting sink
///
/// Renders the dynamic queue bottom to top (`*` marks a promoted process)
/// and the wait set in resume order with remaining quanta.
pub struct Reporter {
    manager: Arc<ProcessManager>,
    console: Arc<Console>,
    json: bool,
}

impl Reporter {
    /// `MLFQ_REPORT_JSON=1` switches the rendering to JSON lines
    pub fn new(manager: Arc<ProcessManager>, console: Arc<Console>) -> Self {
        let json = std::env::var("MLFQ_REPORT_JSON")
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);
        Self {
            manager,
            console,
            json,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Take a consistent snapshot of both structures
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            tick: self.manager.now(),
            queue: self.manager.queue_snapshot(),
            waiting: self.manager.wait_snapshot(),
        }
    }

    /// Render one snapshot to the console
    pub fn report(&self) {
        let snapshot = self.snapshot();
        if self.json {
            match serde_json::to_string(&snapshot) {
                Ok(line) => self.console.line(format_args!("{}", line)),
                Err(e) => warn!("snapshot serialization failed: {}", e),
            }
            return;
        }
        self.console
            .line(format_args!("DQ: {}", render_queue(&snapshot.queue)));
        self.console
            .line(format_args!("WQ: {}", render_waiting(&snapshot.waiting)));
    }

    /// Print a snapshot every `interval` until the scheduler finishes
    pub fn spawn_periodic(self, interval: Duration) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("reporter".to_string())
            .spawn(move || loop {
                thread::sleep(interval);
                if self.manager.is_finished() {
                    break;
                }
                self.report();
            })
    }
}

fn render_queue(snapshot: &QueueSnapshot) -> String {
    let mut out = String::from("bottom => [");
    for (idx, level) in snapshot.levels.iter().enumerate() {
        if idx > 0 {
            out.push('|');
        }
        for process in &level.processes {
            let _ = write!(
                out,
                " {}{}{}",
                process.pid,
                process.class.tag(),
                if process.promoted { "*" } else { "" }
            );
        }
        out.push(' ');
    }
    out.push(']');
    out
}

fn render_waiting(waiting: &[WaitingProcess]) -> String {
    let mut out = String::from("[");
    for process in waiting {
        let _ = write!(
            out,
            " {}{}:{}",
            process.pid,
            process.class.tag(),
            process.remaining
        );
    }
    out.push_str(" ]");
    out
}

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: filter directives (default: info)
/// - MLFQ_TRACE_JSON: JSON log output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("MLFQ_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .compact(),
            )
            .init();
    }
}
