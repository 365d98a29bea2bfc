//! Telemetry state shared between the client and the policy engine

use std::sync::Arc;

use parking_lot::RwLock;

/// Last telemetry values reported by the in-simulator plugin
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TelemetrySnapshot {
    /// Whether the plugin channel is currently connected
    pub plugin_active: bool,
    /// Bus speed in km/h
    pub bus_speed_kph: f32,
    /// Whether a timetable is currently active
    pub schedule_active: bool,
}

/// Shared handle to the telemetry snapshot
///
/// Single writer (the telemetry client), any number of readers. Readers
/// tolerate a value up to one polling interval stale; the snapshot only
/// gates policy decisions.
#[derive(Clone, Debug, Default)]
pub struct TelemetryHandle {
    inner: Arc<RwLock<TelemetrySnapshot>>,
}

impl TelemetryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, copied out
    pub fn snapshot(&self) -> TelemetrySnapshot {
        *self.inner.read()
    }

    /// Overwrite the gameplay fields after a successful parse
    pub fn record(&self, bus_speed_kph: f32, schedule_active: bool) {
        let mut guard = self.inner.write();
        guard.plugin_active = true;
        guard.bus_speed_kph = bus_speed_kph;
        guard.schedule_active = schedule_active;
    }

    /// Mark the plugin reachable or not; gameplay fields are left as-is
    pub fn set_plugin_active(&self, active: bool) {
        self.inner.write().plugin_active = active;
    }
}
