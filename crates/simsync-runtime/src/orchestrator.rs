//! The once-per-second coordinating loop
//!
//! Each tick: poll the lifecycle monitor, read the simulator clock,
//! maybe invoke the policy engine and write, publish observer-facing
//! status. Ticks are single-threaded and never overlap.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use simsync_core::{AttachmentState, SyncError, SyncResult, SyncStatus};
use simsync_memory::{read_clock, write_clock, LifecycleMonitor, ProcessProbe};
use simsync_policy::{evaluate, SyncAction};

use crate::context::SyncContext;

/// Tick period of the coordinating loop
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drives lifecycle, clock access, and the policy engine
pub struct Orchestrator<P: ProcessProbe> {
    monitor: LifecycleMonitor<P>,
    context: SyncContext,
    status: SyncStatus,
    last_reading: Option<NaiveDateTime>,
}

impl<P: ProcessProbe> Orchestrator<P> {
    pub fn new(monitor: LifecycleMonitor<P>, context: SyncContext) -> Self {
        Orchestrator {
            monitor,
            context,
            status: SyncStatus::NotRunning,
            last_reading: None,
        }
    }

    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SyncContext {
        &mut self.context
    }

    /// Status published by the last tick
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Last valid clock reading, if the previous tick had one
    pub fn last_reading(&self) -> Option<NaiveDateTime> {
        self.last_reading
    }

    /// One tick of the loop.
    ///
    /// `wall` is unadjusted wall-clock time; the configured offset
    /// hours are applied here before any comparison or write.
    pub fn tick(&mut self, wall: NaiveDateTime) -> SyncStatus {
        let system_time = self.context.system_time(wall);

        if self.monitor.poll() != AttachmentState::Attached {
            self.last_reading = None;
            return self.publish(SyncStatus::NotRunning);
        }

        let reading = match self.monitor.memory().map(read_clock) {
            Some(Ok(reading)) => reading,
            // Attached but unreadable: running, no scene loaded yet
            _ => {
                self.last_reading = None;
                return self.publish(SyncStatus::AwaitingScene);
            }
        };
        self.last_reading = Some(reading);

        if self.context.policy().auto_sync {
            // A failed write is retried on the next tick
            if let Err(error) = self.sync(reading, system_time) {
                tracing::debug!(%error, "auto sync failed");
            }
        }

        let clock = self.last_reading.unwrap_or(reading);
        self.publish(SyncStatus::Running { clock })
    }

    /// Manually triggered sync, the hotkey/button path.
    ///
    /// Runs the same gates as the automatic path. Returns false when
    /// the simulator is not attached, no scene is loaded, or a write
    /// failed; the caller may inform the user synchronously.
    pub fn sync_now(&mut self, wall: NaiveDateTime) -> bool {
        let system_time = self.context.system_time(wall);

        if !self.monitor.state().is_attached() {
            return false;
        }
        let reading = match self.monitor.memory().map(read_clock) {
            Some(Ok(reading)) => reading,
            _ => return false,
        };
        self.last_reading = Some(reading);

        self.sync(reading, system_time).is_ok()
    }

    /// Evaluate the policy and, on a write decision, perform the six
    /// field writes followed by a re-read to refresh the cached
    /// reading.
    fn sync(&mut self, reading: NaiveDateTime, system_time: NaiveDateTime) -> SyncResult<()> {
        let telemetry = self.context.telemetry().snapshot();
        let action = evaluate(reading, system_time, self.context.policy(), &telemetry);

        if let SyncAction::WriteClock(new_time) = action {
            let Some(mem) = self.monitor.memory() else {
                return Err(SyncError::NotAttached);
            };
            write_clock(mem, new_time)?;
            tracing::debug!(%new_time, "simulator clock written");
            self.last_reading = read_clock(mem).ok();
        }

        Ok(())
    }

    fn publish(&mut self, status: SyncStatus) -> SyncStatus {
        if status != self.status {
            tracing::info!(%status, "status changed");
        }
        self.status = status;
        status
    }

    /// Drive ticks on the fixed period until the shutdown signal
    /// fires. Each tick completes before the next is scheduled; a slow
    /// tick delays the following one instead of overlapping it.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick(Local::now().naive_local());
                }
                _ = shutdown.changed() => return,
            }
        }
    }
}
