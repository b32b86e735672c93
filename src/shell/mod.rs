/*!
 * Shell
 * External collaborators: admission sources and the toy command interpreter
 */

pub mod command;
pub mod interp;
pub mod source;

pub use command::{parse_command, parse_line, Command};
pub use interp::Interpreter;
pub use source::{spawn_batch, spawn_interactive};

/// Where a request line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Interactive,
    Batch,
}

/// One submitted command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub line: String,
    pub origin: Origin,
}

impl Request {
    pub fn interactive(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            origin: Origin::Interactive,
        }
    }

    pub fn batch(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            origin: Origin::Batch,
        }
    }
}
