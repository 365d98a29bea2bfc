//! SimSync Runtime - The coordinating loop
//!
//! Wires the lifecycle monitor, clock accessor, and policy engine into
//! a once-per-second tick, publishes observer-facing status, and
//! persists the app config across runs.

pub mod config_io;
pub mod context;
pub mod orchestrator;

pub use config_io::*;
pub use context::*;
pub use orchestrator::*;
