//! SimSync Telemetry - Best-effort client for the in-simulator plugin
//!
//! A long-lived background loop that requests gameplay telemetry once a
//! second over a duplex byte stream and survives every disconnect:
//! - Line protocol: request token out, `speed*schedule` back
//! - Connector abstraction over the duplex channel
//! - Self-healing state machine (Disconnected/Connecting/Connected)

pub mod client;
pub mod connector;
pub mod parse;

pub use client::*;
pub use connector::*;
pub use parse::*;
