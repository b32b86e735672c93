/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Simulated-time tick; the clock advances by exactly one per quantum
pub type Tick = u64;
