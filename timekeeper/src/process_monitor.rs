//! OS process liveness for the reconciler.

use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, System};

/// Answers "is this pid alive right now?" for the reconciler.
pub trait LivenessCheck {
    fn is_running(&mut self, pid: u32) -> bool;
}

/// [`LivenessCheck`] backed by the OS process list.
///
/// Each check refreshes only the requested pid. Zombie and dead entries count
/// as gone: an alert child that already exited but has not been reaped is no
/// longer pending.
pub struct ProcessTable {
    sys: System,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LivenessCheck for ProcessTable {
    fn is_running(&mut self, pid: u32) -> bool {
        let pid = Pid::from_u32(pid);
        self.sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        self.sys
            .process(pid)
            .map(|p| !matches!(p.status(), ProcessStatus::Zombie | ProcessStatus::Dead))
            .unwrap_or(false)
    }
}
