//! Explicit context passed to the tick loop

use chrono::{Duration, NaiveDateTime};

use simsync_core::{SyncPolicy, TelemetryHandle, OFFSET_HOURS_MAX, OFFSET_HOURS_MIN};

/// Policy and telemetry wiring injected into the orchestrator
///
/// Replaces hidden module-level state with a passed object while
/// keeping single-writer/many-reader semantics: the orchestrator owns
/// the policy, the telemetry client writes the snapshot behind the
/// handle.
#[derive(Clone, Debug)]
pub struct SyncContext {
    policy: SyncPolicy,
    telemetry: TelemetryHandle,
}

impl SyncContext {
    pub fn new(policy: SyncPolicy, telemetry: TelemetryHandle) -> Self {
        SyncContext { policy, telemetry }
    }

    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// For explicit user or config actions only; the tick loop never
    /// mutates the policy
    pub fn policy_mut(&mut self) -> &mut SyncPolicy {
        &mut self.policy
    }

    pub fn telemetry(&self) -> &TelemetryHandle {
        &self.telemetry
    }

    /// Wall-clock time adjusted by the configured offset hours
    pub fn system_time(&self, wall: NaiveDateTime) -> NaiveDateTime {
        let offset = self
            .policy
            .offset_hours
            .clamp(OFFSET_HOURS_MIN, OFFSET_HOURS_MAX);
        wall + Duration::hours(offset as i64)
    }
}
