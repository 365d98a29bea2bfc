//! A simulated target process
//!
//! Backs the probe and memory-access traits with an in-memory byte
//! image of the clock block, so the whole attach/read/sync/detach loop
//! runs without a real foreign process.

use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::Mutex;

use simsync_core::{SyncError, SyncResult};
use simsync_memory::offsets;
use simsync_memory::{read_clock, write_clock, MemoryAccess, ProcessProbe};

/// Pid the simulated process reports
pub const SIM_PID: u32 = 4242;

struct TargetState {
    /// Clock block image, offsets::HOUR..offsets::YEAR + 4
    image: Vec<u8>,
    running: bool,
    /// Number of upcoming open attempts that should fail
    open_failures: u32,
    opens: u32,
}

impl TargetState {
    fn index(&self, offset: usize, len: usize) -> SyncResult<usize> {
        let start = offset
            .checked_sub(offsets::HOUR)
            .ok_or(SyncError::MemoryRead { offset })?;
        if start + len > self.image.len() {
            return Err(SyncError::MemoryRead { offset });
        }
        Ok(start)
    }
}

/// Handle to the simulated target; clones share one process
#[derive(Clone)]
pub struct SimTarget {
    state: Arc<Mutex<TargetState>>,
}

impl SimTarget {
    /// A running target with no scene loaded (clock block zeroed)
    pub fn new() -> Self {
        SimTarget {
            state: Arc::new(Mutex::new(TargetState {
                image: vec![0u8; offsets::YEAR + 4 - offsets::HOUR],
                running: true,
                open_failures: 0,
                opens: 0,
            })),
        }
    }

    /// A target that is not running yet
    pub fn stopped() -> Self {
        let target = Self::new();
        target.set_running(false);
        target
    }

    pub fn set_running(&self, running: bool) {
        self.state.lock().running = running;
    }

    /// Load a scene: the clock block becomes a valid timestamp
    pub fn load_scene(&self, clock: NaiveDateTime) {
        let mut handle = SimHandle {
            state: Arc::clone(&self.state),
        };
        write_clock(&mut handle, clock).expect("simulated clock write");
    }

    /// Unload the scene: the clock block degrades to garbage
    pub fn unload_scene(&self) {
        self.state.lock().image.fill(0);
    }

    /// Current clock block contents, if they form a valid timestamp
    pub fn clock(&self) -> Option<NaiveDateTime> {
        let mut handle = SimHandle {
            state: Arc::clone(&self.state),
        };
        read_clock(&mut handle).ok()
    }

    /// Make the next `count` open attempts fail
    pub fn fail_next_opens(&self, count: u32) {
        self.state.lock().open_failures = count;
    }

    /// Total open attempts seen so far
    pub fn opens(&self) -> u32 {
        self.state.lock().opens
    }

    pub fn probe(&self) -> SimProbe {
        SimProbe {
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for SimTarget {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe half of the simulated target
pub struct SimProbe {
    state: Arc<Mutex<TargetState>>,
}

impl ProcessProbe for SimProbe {
    type Handle = SimHandle;

    fn find_by_name(&mut self, _name: &str) -> Option<u32> {
        self.state.lock().running.then_some(SIM_PID)
    }

    fn open(&mut self, pid: u32) -> SyncResult<Self::Handle> {
        let mut state = self.state.lock();
        state.opens += 1;
        if state.open_failures > 0 {
            state.open_failures -= 1;
            return Err(SyncError::AttachFailed { pid });
        }
        Ok(SimHandle {
            state: Arc::clone(&self.state),
        })
    }
}

/// Memory-access half; reads and writes fail once the process is gone
pub struct SimHandle {
    state: Arc<Mutex<TargetState>>,
}

impl MemoryAccess for SimHandle {
    fn read_u8(&mut self, offset: usize) -> SyncResult<u8> {
        let state = self.state.lock();
        if !state.running {
            return Err(SyncError::MemoryRead { offset });
        }
        let start = state.index(offset, 1)?;
        Ok(state.image[start])
    }

    fn read_i32(&mut self, offset: usize) -> SyncResult<i32> {
        let state = self.state.lock();
        if !state.running {
            return Err(SyncError::MemoryRead { offset });
        }
        let start = state.index(offset, 4)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&state.image[start..start + 4]);
        Ok(i32::from_le_bytes(buf))
    }

    fn read_f32(&mut self, offset: usize) -> SyncResult<f32> {
        let state = self.state.lock();
        if !state.running {
            return Err(SyncError::MemoryRead { offset });
        }
        let start = state.index(offset, 4)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&state.image[start..start + 4]);
        Ok(f32::from_le_bytes(buf))
    }

    fn write_i32(&mut self, offset: usize, value: i32) -> SyncResult<()> {
        let mut state = self.state.lock();
        if !state.running {
            return Err(SyncError::MemoryWrite { offset });
        }
        let start = state.index(offset, 4)?;
        state.image[start..start + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn write_f32(&mut self, offset: usize, value: f32) -> SyncResult<()> {
        let mut state = self.state.lock();
        if !state.running {
            return Err(SyncError::MemoryWrite { offset });
        }
        let start = state.index(offset, 4)?;
        state.image[start..start + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use simsync_core::AttachmentState;
    use simsync_memory::LifecycleMonitor;

    fn scene_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 4)
            .unwrap()
            .and_hms_opt(13, 5, 42)
            .unwrap()
    }

    #[test]
    fn test_scene_clock_roundtrip() {
        let target = SimTarget::new();
        assert_eq!(target.clock(), None);

        target.load_scene(scene_clock());
        assert_eq!(target.clock(), Some(scene_clock()));

        target.unload_scene();
        assert_eq!(target.clock(), None);
    }

    #[test]
    fn test_monitor_against_sim_target() {
        let target = SimTarget::stopped();
        let mut monitor = LifecycleMonitor::new(target.probe(), "omsi");

        assert_eq!(monitor.poll(), AttachmentState::Detached);

        target.set_running(true);
        assert_eq!(monitor.poll(), AttachmentState::Attached);

        target.set_running(false);
        assert_eq!(monitor.poll(), AttachmentState::Detached);
        assert_eq!(target.opens(), 1);
    }

    #[test]
    fn test_open_failure_injection() {
        let target = SimTarget::new();
        target.fail_next_opens(1);
        let mut monitor = LifecycleMonitor::new(target.probe(), "omsi");

        assert_eq!(monitor.poll(), AttachmentState::Detached);
        assert_eq!(monitor.poll(), AttachmentState::Attached);
        assert_eq!(target.opens(), 2);
    }

    #[test]
    fn test_dead_process_reads_fail() {
        let target = SimTarget::new();
        target.load_scene(scene_clock());

        let mut handle = target.probe().open(SIM_PID).unwrap();
        target.set_running(false);

        assert!(read_clock(&mut handle).is_err());
    }
}
