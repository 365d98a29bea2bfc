//! The per-tick sync decision

use chrono::{Duration, NaiveDateTime};

use simsync_core::{delta_seconds, AutoSyncMode, SyncPolicy, TelemetrySnapshot};

/// Threshold the simulator clock must trail wall-clock time by before a
/// behind-only sync fires, in fractional seconds
pub const BEHIND_THRESHOLD_SECS: f64 = 1.0;

/// Forward bias added on behind-only writes, in whole seconds
///
/// A downstream consumer caches the previous reading and treats a write
/// landing at or before it as "in the past"; the bias keeps the fresh
/// value ahead of that cache. Preserved literally.
pub const BEHIND_WRITE_BIAS_SECS: i64 = 2;

/// Outcome of one policy evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncAction {
    /// Leave the simulator clock alone this tick
    None,
    /// Overwrite the simulator clock with this timestamp
    WriteClock(NaiveDateTime),
}

/// Decide whether and what to write this tick.
///
/// `reading` must be a valid parsed timestamp; unreadable ticks never
/// reach the engine.
pub fn evaluate(
    reading: NaiveDateTime,
    system_time: NaiveDateTime,
    policy: &SyncPolicy,
    telemetry: &TelemetrySnapshot,
) -> SyncAction {
    let delta = delta_seconds(system_time, reading);

    if policy.only_if_behind && delta <= BEHIND_THRESHOLD_SECS {
        return SyncAction::None;
    }

    if !mode_allows(policy.mode, telemetry) {
        return SyncAction::None;
    }

    let new_time = if policy.only_if_behind {
        system_time + Duration::seconds(BEHIND_WRITE_BIAS_SECS)
    } else {
        system_time
    };

    SyncAction::WriteClock(new_time)
}

/// Telemetry gate for the configured mode
///
/// Every mode except `Always` requires a live plugin; while the plugin
/// is unreachable those modes never fire.
pub fn mode_allows(mode: AutoSyncMode, telemetry: &TelemetrySnapshot) -> bool {
    match mode {
        AutoSyncMode::Always => true,
        _ if !telemetry.plugin_active => false,
        AutoSyncMode::WhenMoving => telemetry.bus_speed_kph > 0.0,
        AutoSyncMode::WhenStationary => telemetry.bus_speed_kph == 0.0,
        AutoSyncMode::WhenScheduled => telemetry.schedule_active,
        AutoSyncMode::WhenUnscheduled => !telemetry.schedule_active,
    }
}
