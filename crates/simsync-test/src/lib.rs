//! SimSync Test - Harness pieces for exercising the full loop
//!
//! - A simulated target process with a byte-image clock block,
//!   controllable presence, and injectable open failures
//! - A loopback telemetry peer speaking the line protocol over an
//!   in-memory duplex stream

pub mod peer;
pub mod sim;

pub use peer::*;
pub use sim::*;
