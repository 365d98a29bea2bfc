//! SimSync Policy - The sync decision engine
//!
//! Given the simulator clock reading, the (offset) wall-clock time, the
//! configured policy, and the latest telemetry snapshot, decide whether
//! the simulator clock gets overwritten this tick and with what.

pub mod engine;

pub use engine::*;
