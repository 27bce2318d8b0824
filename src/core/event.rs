use crate::core::{Pid, ProcessState, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedCoreEvent {
    ProcessStateChange {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },
    // Process handed the CPU for a slice of `ticks`
    Dispatch {
        pid: Pid,
        ticks: Ticks,
    },
    // CPU idle even after dispatch()
    CpuIdle,
}
