//! Process memory capability traits
//!
//! Opening a foreign process and poking bytes into it is a platform
//! capability; SimSync consumes it through these traits and never
//! reimplements the mechanism. Test builds substitute an in-memory
//! image.

use simsync_core::SyncResult;

/// Read/write access to the memory of one opened process
///
/// All offsets are relative to the target's load base; implementations
/// translate them to absolute addresses.
pub trait MemoryAccess {
    fn read_u8(&mut self, offset: usize) -> SyncResult<u8>;
    fn read_i32(&mut self, offset: usize) -> SyncResult<i32>;
    fn read_f32(&mut self, offset: usize) -> SyncResult<f32>;

    fn write_i32(&mut self, offset: usize, value: i32) -> SyncResult<()>;
    fn write_f32(&mut self, offset: usize, value: f32) -> SyncResult<()>;
}

/// Locating and opening the target process
pub trait ProcessProbe {
    /// Held open for the lifetime of one attachment; dropping it
    /// releases the process.
    type Handle: MemoryAccess;

    /// Find a running process by name, if any
    fn find_by_name(&mut self, name: &str) -> Option<u32>;

    /// Open the process for memory access
    fn open(&mut self, pid: u32) -> SyncResult<Self::Handle>;
}
