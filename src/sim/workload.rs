use std::{fs, path::Path};

use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    core::{Pid, Priority, Process, ProcessId, Ticks},
    error::{SimError, SimResult},
};

pub const ARRIVAL_MAX: Ticks = 50;
pub const BURST_MIN: Ticks = 1;
pub const BURST_MAX: Ticks = 20;
pub const PRIORITY_MAX: Priority = 10;

/// Immutable input description of one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    pub pid: Pid,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: Priority,
}

impl ProcessDescriptor {
    pub fn new(pid: Pid, arrival_time: Ticks, burst_time: Ticks, priority: Priority) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
            priority,
        }
    }

    /// Fresh per-run record: full remaining time, no timestamps.
    pub fn instantiate(&self, id: ProcessId) -> Process {
        Process::new(
            id,
            self.pid,
            self.arrival_time,
            self.burst_time,
            self.priority,
        )
    }
}

/// Uniform random workload with sequential pids starting at 0.
pub fn generate_workload<R: Rng>(count: usize, rng: &mut R) -> Vec<ProcessDescriptor> {
    (0..count)
        .map(|pid| ProcessDescriptor {
            pid: pid as Pid,
            arrival_time: rng.random_range(0..=ARRIVAL_MAX),
            burst_time: rng.random_range(BURST_MIN..=BURST_MAX),
            priority: rng.random_range(0..=PRIORITY_MAX),
        })
        .collect()
}

/// Read a JSON array of descriptors and validate it.
pub fn load_workload(path: &Path) -> SimResult<Vec<ProcessDescriptor>> {
    let raw = fs::read_to_string(path)?;
    let workload: Vec<ProcessDescriptor> = serde_json::from_str(&raw)?;
    validate_workload(&workload)?;
    Ok(workload)
}

pub fn validate_workload(workload: &[ProcessDescriptor]) -> SimResult<()> {
    let mut seen = FxHashSet::default();
    for desc in workload {
        if desc.burst_time == 0 {
            return Err(SimError::InvalidDescriptor {
                pid: desc.pid,
                burst_time: desc.burst_time,
            });
        }
        if !seen.insert(desc.pid) {
            return Err(SimError::DuplicatePid(desc.pid));
        }
    }
    Ok(())
}
