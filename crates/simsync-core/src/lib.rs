//! SimSync Core - Shared types for the simulator clock synchronizer
//!
//! This crate defines the types used throughout SimSync:
//! - Calendar clock composition from raw memory fields
//! - Sync policy configuration and the persisted app config
//! - Telemetry snapshot and its shared handle
//! - Attachment and observer-facing status
//! - Error taxonomy

pub mod clock;
pub mod config;
pub mod error;
pub mod status;
pub mod telemetry;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use status::*;
pub use telemetry::*;
