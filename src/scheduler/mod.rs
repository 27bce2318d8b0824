pub mod fcfs;
pub mod mlq;
pub mod prio;
pub mod rr;
pub mod sjf;

use std::fmt;

use serde::Serialize;

use crate::core::{
    Ticks,
    state::{ProcessId, SimCtx},
};
pub use fcfs::FcfsScheduler;
pub use mlq::MlqScheduler;
pub use prio::{PrioNonPreemptive, PrioPreemptive, PrioScheduler};
pub use rr::RrScheduler;
pub use sjf::{SjfNonPreemptive, SjfPreemptive, SjfScheduler};

pub type EnqueueFlags = u64;

// First admission after arrival
pub const SCHED_ENQ_WAKEUP: EnqueueFlags = 1 << 0;
// Slice ended before the process finished
pub const SCHED_ENQ_PREEMPT: EnqueueFlags = 1 << 32;
pub const SCHED_ENQ_REENQ: EnqueueFlags = 1 << 40;

pub const SCHED_QUANTUM_DFL: Ticks = 2;

/// How long a dispatched process may hold the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    /// Run until `remaining_time` reaches zero.
    ToCompletion,
    /// Run for at most the given quantum, then requeue at the back.
    Quantum(Ticks),
    /// Run for one tick, then reselect.
    Tick,
}

impl Slice {
    pub fn ticks(self, remaining: Ticks) -> Ticks {
        match self {
            Self::ToCompletion => remaining,
            Self::Quantum(quantum) => quantum.min(remaining),
            Self::Tick => remaining.min(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub process: ProcessId,
    pub slice: Slice,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DispatchError {
    NoRunnableProcess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedParams {
    pub quantum: Ticks,
}

impl Default for SchedParams {
    fn default() -> Self {
        Self {
            quantum: SCHED_QUANTUM_DFL,
        }
    }
}

pub trait Scheduler {
    fn init(ctx: &mut SimCtx, params: &SchedParams) -> Self;

    /// Place a ready process into one of the policy's ready structures.
    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, flags: EnqueueFlags);

    /// Remove the next process to run from the ready structures.
    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError>;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, clap::ValueEnum,
)]
pub enum Policy {
    /// First come, first served
    Fcfs,
    /// Shortest job first, non-preemptive
    Sjf,
    /// Shortest remaining time first (preemptive SJF)
    Srtf,
    /// Round robin
    Rr,
    /// Priority, non-preemptive
    Prio,
    /// Priority, preemptive
    PrioPreemptive,
    /// Multilevel queue with three priority tiers
    Mlq,
}

impl Policy {
    pub const ALL: [Policy; 7] = [
        Policy::Fcfs,
        Policy::Sjf,
        Policy::Srtf,
        Policy::Rr,
        Policy::Prio,
        Policy::PrioPreemptive,
        Policy::Mlq,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Sjf => "SJF (Non-preemptive)",
            Policy::Srtf => "SJF (Preemptive)",
            Policy::Rr => "Round Robin",
            Policy::Prio => "Priority (Non-preemptive)",
            Policy::PrioPreemptive => "Priority (Preemptive)",
            Policy::Mlq => "Multilevel Queue",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_lengths() {
        assert_eq!(Slice::ToCompletion.ticks(7), 7);
        assert_eq!(Slice::Quantum(2).ticks(7), 2);
        assert_eq!(Slice::Quantum(4).ticks(3), 3);
        assert_eq!(Slice::Tick.ticks(7), 1);
    }

    #[test]
    fn policies_are_ordered_for_reporting() {
        let mut shuffled = vec![Policy::Mlq, Policy::Fcfs, Policy::Rr, Policy::Srtf];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Policy::Fcfs, Policy::Srtf, Policy::Rr, Policy::Mlq]
        );
        assert_eq!(Policy::PrioPreemptive.to_string(), "Priority (Preemptive)");
    }
}
