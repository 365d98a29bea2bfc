//! Attach/detach lifecycle against the transient target process

use simsync_core::AttachmentState;

use crate::capability::ProcessProbe;

/// Default process name of the monitored simulator
pub const DEFAULT_PROCESS_NAME: &str = "omsi";

/// Polls for the target process and owns the attachment handle
///
/// The handle is exclusively owned here; no other component touches the
/// target's memory concurrently.
pub struct LifecycleMonitor<P: ProcessProbe> {
    probe: P,
    process_name: String,
    handle: Option<P::Handle>,
}

impl<P: ProcessProbe> LifecycleMonitor<P> {
    pub fn new(probe: P, process_name: impl Into<String>) -> Self {
        LifecycleMonitor {
            probe,
            process_name: process_name.into(),
            handle: None,
        }
    }

    /// One poll of the process table.
    ///
    /// At most one attach attempt per call; an open failure is logged
    /// and retried on the next poll, never surfaced. Disappearance of
    /// the process releases the handle.
    pub fn poll(&mut self) -> AttachmentState {
        let pid = self.probe.find_by_name(&self.process_name);

        match (pid, self.handle.is_some()) {
            (Some(pid), false) => match self.probe.open(pid) {
                Ok(handle) => {
                    tracing::info!(pid, process = %self.process_name, "attached");
                    self.handle = Some(handle);
                }
                Err(error) => {
                    tracing::debug!(pid, %error, "open failed, retrying next poll");
                }
            },
            (None, true) => {
                tracing::info!(process = %self.process_name, "process gone, detaching");
                self.handle = None;
            }
            _ => {}
        }

        self.state()
    }

    pub fn state(&self) -> AttachmentState {
        if self.handle.is_some() {
            AttachmentState::Attached
        } else {
            AttachmentState::Detached
        }
    }

    /// Memory access for the current attachment, if any
    pub fn memory(&mut self) -> Option<&mut P::Handle> {
        self.handle.as_mut()
    }
}
