/*!
 * MLFQ Simulator - Main Entry Point
 *
 * Wires the scheduling core to its collaborators:
 * - interactive and batch admission sources
 * - the toy command interpreter
 * - the periodic snapshot reporter
 */

use anyhow::Result;
use mlfq_sim::shell::{spawn_batch, spawn_interactive};
use mlfq_sim::{init_tracing, Console, Interpreter, ProcessManager, Reporter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const TOTAL_CAPACITY: usize = 10;
const QUANTUM: Duration = Duration::from_secs(1);
const BATCH_INTERVAL: Duration = Duration::from_secs(5);
const REPORT_INTERVAL: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    init_tracing();

    info!("MLFQ simulator starting");

    let console = Arc::new(Console::new());
    let manager = Arc::new(
        ProcessManager::builder()
            .with_capacity(TOTAL_CAPACITY)
            .with_quantum(QUANTUM)
            .with_console(Arc::clone(&console))
            .build(),
    );

    // both admission sources feed one channel; it closes once every sender
    // is gone and the interpreter then seals the manager
    let (requests_tx, requests_rx) = flume::unbounded();

    let mut sources = Vec::new();
    sources.push(spawn_interactive(
        requests_tx.clone(),
        Arc::clone(&console),
    )?);

    let batch_path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "commands.txt".to_string()),
    );
    if batch_path.exists() {
        info!(path = %batch_path.display(), "batch source attached");
        sources.push(spawn_batch(
            batch_path,
            BATCH_INTERVAL,
            requests_tx.clone(),
        )?);
    }
    drop(requests_tx);

    let interp = Interpreter::new(Arc::clone(&manager), Arc::clone(&console));
    let interp_handle = interp.spawn(requests_rx)?;

    let reporter = Reporter::new(Arc::clone(&manager), Arc::clone(&console));
    let reporter_handle = reporter.spawn_periodic(REPORT_INTERVAL)?;

    manager.run();

    for source in sources {
        let _ = source.join();
    }
    let _ = interp_handle.join();
    let _ = reporter_handle.join();

    let stats = manager.stats();
    info!(
        admitted = stats.admitted,
        completed = stats.completed,
        promotions = stats.promotions,
        splits = stats.splits,
        ticks = stats.clock,
        "simulation drained"
    );
    Ok(())
}
