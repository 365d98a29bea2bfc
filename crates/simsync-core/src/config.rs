//! Sync policy configuration and the persisted app config

use crate::{SyncError, SyncResult};

/// Lowest accepted wall-clock offset, in hours
pub const OFFSET_HOURS_MIN: i32 = -23;
/// Highest accepted wall-clock offset, in hours
pub const OFFSET_HOURS_MAX: i32 = 23;

/// When automatic synchronization is allowed to fire
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AutoSyncMode {
    /// Sync whenever the behind-check passes
    #[default]
    Always,
    /// Sync only while the bus is moving
    WhenMoving,
    /// Sync only while the bus is stationary
    WhenStationary,
    /// Sync only while a timetable is active
    WhenScheduled,
    /// Sync only while no timetable is active
    WhenUnscheduled,
}

impl AutoSyncMode {
    /// Decode the persisted mode index
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(AutoSyncMode::Always),
            1 => Some(AutoSyncMode::WhenMoving),
            2 => Some(AutoSyncMode::WhenStationary),
            3 => Some(AutoSyncMode::WhenScheduled),
            4 => Some(AutoSyncMode::WhenUnscheduled),
            _ => None,
        }
    }

    /// The persisted mode index
    pub fn index(self) -> i32 {
        match self {
            AutoSyncMode::Always => 0,
            AutoSyncMode::WhenMoving => 1,
            AutoSyncMode::WhenStationary => 2,
            AutoSyncMode::WhenScheduled => 3,
            AutoSyncMode::WhenUnscheduled => 4,
        }
    }
}

/// Policy consulted by the sync engine on every tick
///
/// Mutated only by explicit user or config actions, never by the tick
/// loop itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncPolicy {
    /// Run the policy engine automatically each tick
    pub auto_sync: bool,
    /// Only overwrite the simulator clock when it trails wall-clock time
    pub only_if_behind: bool,
    /// Signed wall-clock adjustment in hours, within [-23, 23]
    pub offset_hours: i32,
    /// Telemetry-gated sync mode
    pub mode: AutoSyncMode,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        SyncPolicy {
            auto_sync: true,
            only_if_behind: true,
            offset_hours: 0,
            mode: AutoSyncMode::Always,
        }
    }
}

/// The nine persisted scalars, in file order
///
/// The window fields and the hotkey index belong to the outer shell; they
/// are round-tripped here so a partial rewrite of the file never drops
/// them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppConfig {
    pub always_on_top: bool,
    pub auto_sync: bool,
    pub only_if_behind: bool,
    pub offset_hours: i32,
    pub offset_hours_index: i32,
    pub window_left: i32,
    pub window_top: i32,
    pub manual_hotkey_index: i32,
    pub auto_sync_mode_index: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            always_on_top: false,
            auto_sync: true,
            only_if_behind: true,
            offset_hours: 0,
            // Index 23 is the zero-offset slot in the -23..+23 list
            offset_hours_index: 23,
            window_left: -1,
            window_top: -1,
            manual_hotkey_index: 0,
            auto_sync_mode_index: 0,
        }
    }
}

impl AppConfig {
    /// Parse the nine ordered lines.
    ///
    /// Any missing or malformed line fails the whole set; callers fall
    /// back to defaults wholesale rather than applying a partial config.
    pub fn from_lines<'a>(mut lines: impl Iterator<Item = &'a str>) -> SyncResult<Self> {
        let always_on_top = take_bool(&mut lines, 1)?;
        let auto_sync = take_bool(&mut lines, 2)?;
        let only_if_behind = take_bool(&mut lines, 3)?;
        let offset_hours = take_i32(&mut lines, 4)?.clamp(OFFSET_HOURS_MIN, OFFSET_HOURS_MAX);
        let offset_hours_index = take_i32(&mut lines, 5)?;
        let window_left = take_i32(&mut lines, 6)?;
        let window_top = take_i32(&mut lines, 7)?;
        let manual_hotkey_index = take_i32(&mut lines, 8)?;
        let auto_sync_mode_index = take_i32(&mut lines, 9)?;

        Ok(AppConfig {
            always_on_top,
            auto_sync,
            only_if_behind,
            offset_hours,
            offset_hours_index,
            window_left,
            window_top,
            manual_hotkey_index,
            auto_sync_mode_index,
        })
    }

    /// Serialize back to the nine-line format
    pub fn to_lines(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
            self.always_on_top,
            self.auto_sync,
            self.only_if_behind,
            self.offset_hours,
            self.offset_hours_index,
            self.window_left,
            self.window_top,
            self.manual_hotkey_index,
            self.auto_sync_mode_index,
        )
    }

    /// Derive the tick-loop policy from the persisted scalars
    ///
    /// An out-of-range mode index falls back to `Always`.
    pub fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            auto_sync: self.auto_sync,
            only_if_behind: self.only_if_behind,
            offset_hours: self.offset_hours.clamp(OFFSET_HOURS_MIN, OFFSET_HOURS_MAX),
            mode: AutoSyncMode::from_index(self.auto_sync_mode_index).unwrap_or_default(),
        }
    }
}

fn take_bool<'a>(lines: &mut impl Iterator<Item = &'a str>, line: usize) -> SyncResult<bool> {
    // The upstream format capitalizes booleans; accept either casing
    lines
        .next()
        .and_then(|s| s.trim().to_ascii_lowercase().parse::<bool>().ok())
        .ok_or(SyncError::ConfigFormat { line })
}

fn take_i32<'a>(lines: &mut impl Iterator<Item = &'a str>, line: usize) -> SyncResult<i32> {
    lines
        .next()
        .and_then(|s| s.trim().parse::<i32>().ok())
        .ok_or(SyncError::ConfigFormat { line })
}
