/*!
 * Process Module
 * The schedulable unit and its observability registry
 */

pub mod table;
pub mod types;

pub use table::ProcessTable;
pub use types::{Process, ProcessClass, ProcessInfo, ProcessState};
