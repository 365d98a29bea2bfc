//! Error types for SimSync
//!
//! Every variant is recoverable: transient external-world conditions
//! are retried on the next tick and must never terminate the
//! monitoring loop.

use thiserror::Error;

/// SimSync errors
#[derive(Error, Debug)]
pub enum SyncError {
    // Attachment errors
    #[error("failed to open process {pid}")]
    AttachFailed { pid: u32 },

    #[error("target process is not attached")]
    NotAttached,

    // Memory errors
    #[error("memory read failed at base+0x{offset:08X}")]
    MemoryRead { offset: usize },

    #[error("memory write failed at base+0x{offset:08X}")]
    MemoryWrite { offset: usize },

    // Clock errors
    #[error("clock fields do not form a valid timestamp")]
    InvalidClock,

    // Config errors
    #[error("malformed config value on line {line}")]
    ConfigFormat { line: usize },

    // Telemetry errors
    #[error("telemetry channel error: {0}")]
    Channel(String),
}

/// Result type for SimSync operations
pub type SyncResult<T> = Result<T, SyncError>;
