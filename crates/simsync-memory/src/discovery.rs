//! Name-based process discovery backed by the OS process table

use sysinfo::{ProcessRefreshKind, System};

/// Finds the target process by name
///
/// Probe implementations embed this for the `find_by_name` half and
/// supply their platform's open mechanism for the other half.
pub struct ProcessDiscovery {
    system: System,
}

impl ProcessDiscovery {
    pub fn new() -> Self {
        ProcessDiscovery {
            system: System::new(),
        }
    }

    /// Refresh the process table and return the lowest pid whose name
    /// starts with `name`, case-insensitively ("omsi" matches
    /// "Omsi.exe").
    pub fn find(&mut self, name: &str) -> Option<u32> {
        self.system
            .refresh_processes_specifics(ProcessRefreshKind::new());

        let needle = name.to_ascii_lowercase();
        self.system
            .processes()
            .iter()
            .filter(|(_, process)| process.name().to_ascii_lowercase().starts_with(&needle))
            .map(|(pid, _)| pid.as_u32())
            .min()
    }
}

impl Default for ProcessDiscovery {
    fn default() -> Self {
        Self::new()
    }
}
