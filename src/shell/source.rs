/*!
 * Admission Sources
 * Interactive and batch producers feeding the shared request channel
 *
 * Each source owns a sender; once every source is done the channel closes
 * and the interpreter seals the scheduler. The sources run concurrently and
 * are never sequenced after one another.
 */

use super::Request;
use crate::monitor::Console;
use flume::Sender;
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Read interactive commands from stdin until EOF
pub fn spawn_interactive(
    requests: Sender<Request>,
    console: Arc<Console>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("shell".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            loop {
                console.prompt("$ ");
                let mut line = String::new();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        if requests.send(Request::interactive(line)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("stdin read failed: {}", e);
                        break;
                    }
                }
            }
            info!("interactive source finished");
        })
}

/// Read one command line per `interval` from a batch file
///
/// Blank lines and `#` comments are skipped.
pub fn spawn_batch(
    path: PathBuf,
    interval: Duration,
    requests: Sender<Request>,
) -> io::Result<thread::JoinHandle<()>> {
    let file = File::open(&path)?;
    thread::Builder::new()
        .name("batch".to_string())
        .spawn(move || {
            for line in BufReader::new(file).lines() {
                match line {
                    Ok(line) => {
                        let line = line.trim();
                        if line.is_empty() || line.starts_with('#') {
                            continue;
                        }
                        if requests.send(Request::batch(line)).is_err() {
                            break;
                        }
                        thread::sleep(interval);
                    }
                    Err(e) => {
                        warn!("batch read failed: {}", e);
                        break;
                    }
                }
            }
            info!("batch source {} finished", path.display());
        })
}
