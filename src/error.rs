use thiserror::Error;

use crate::core::{Pid, Ticks};

/// Failures surfaced before a simulation run starts.
#[derive(Error, Debug)]
pub enum SimError {
    /// A descriptor that can never complete
    #[error("Invalid descriptor for pid {pid}: burst time {burst_time} must be at least one tick")]
    InvalidDescriptor { pid: Pid, burst_time: Ticks },

    #[error("Duplicate pid {0} in workload")]
    DuplicatePid(Pid),

    #[error("Invalid quantum {0}: must be at least one tick")]
    InvalidQuantum(Ticks),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workload format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
