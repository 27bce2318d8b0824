use rustc_hash::FxHashMap;

use super::{
    Dispatch, DispatchError, EnqueueFlags, SCHED_ENQ_WAKEUP, SchedParams, Scheduler, SimCtx,
    Slice,
};
use crate::core::{Priority, ProcessId, RqId, Ticks};

pub const MLQ_NR_TIERS: usize = 3;
// Priorities per tier; everything past the last boundary shares the last tier
pub const MLQ_TIER_WIDTH: Priority = 4;

pub fn tier_for(priority: Priority) -> usize {
    ((priority / MLQ_TIER_WIDTH) as usize).min(MLQ_NR_TIERS - 1)
}

/// Fixed-tier multilevel queue.
///
/// Tier 0 runs each process to completion. Lower tiers are round robin with
/// the configured quantum. A process keeps the tier it was admitted into for
/// the whole run, and a lower tier is only served while every higher tier is
/// empty.
pub struct MlqScheduler {
    tiers: [RqId; MLQ_NR_TIERS],
    tier_of: FxHashMap<ProcessId, usize>,
    quantum: Ticks,
}

impl Scheduler for MlqScheduler {
    fn init(ctx: &mut SimCtx, params: &SchedParams) -> Self {
        Self {
            tiers: std::array::from_fn(|_| ctx.create_rq_fifo()),
            tier_of: FxHashMap::default(),
            quantum: params.quantum,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, flags: EnqueueFlags) {
        let tier = if flags & SCHED_ENQ_WAKEUP != 0 {
            let tier = tier_for(ctx.process(process).priority);
            self.tier_of.insert(process, tier);
            tier
        } else {
            *self
                .tier_of
                .get(&process)
                .expect("Requeued process missing its tier")
        };
        ctx.rq_push_fifo(self.tiers[tier], process);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError> {
        for (tier, &rq) in self.tiers.iter().enumerate() {
            if let Some(process) = ctx.rq_pop(rq) {
                let slice = if tier == 0 {
                    Slice::ToCompletion
                } else {
                    Slice::Quantum(self.quantum)
                };
                return Ok(Dispatch { process, slice });
            }
        }
        Err(DispatchError::NoRunnableProcess)
    }
}
