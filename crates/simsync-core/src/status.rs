//! Attachment and observer-facing status

use std::fmt;

use chrono::NaiveDateTime;

/// Attachment state of the target process
///
/// Owned by the lifecycle monitor. The only transitions are
/// Detached→Attached (process found and opened) and Attached→Detached
/// (process gone).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttachmentState {
    #[default]
    Detached,
    Attached,
}

impl AttachmentState {
    pub fn is_attached(self) -> bool {
        matches!(self, AttachmentState::Attached)
    }
}

/// What an observer (UI label, log line) should show for the last tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    /// Target process not found
    NotRunning,
    /// Attached, but the clock is unreadable: no scene loaded yet
    AwaitingScene,
    /// Attached with a valid clock reading
    Running { clock: NaiveDateTime },
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::NotRunning => write!(f, "simulator is not running"),
            SyncStatus::AwaitingScene => {
                write!(f, "simulator is running, waiting for a scene to load")
            }
            SyncStatus::Running { clock } => write!(f, "simulator clock at {clock}"),
        }
    }
}
