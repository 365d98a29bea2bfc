//! SimSync Memory - The process-memory boundary
//!
//! This crate covers everything that touches the target process:
//! - Capability traits for locating, opening, and reading/writing a
//!   foreign process (the raw mechanism is consumed, not reimplemented)
//! - The fixed offset table of the simulator's clock fields
//! - The clock accessor composing and writing the six fields
//! - The attach/detach lifecycle monitor
//! - sysinfo-backed process discovery

pub mod accessor;
pub mod capability;
pub mod discovery;
pub mod monitor;
pub mod offsets;

pub use accessor::*;
pub use capability::*;
pub use discovery::*;
pub use monitor::*;
