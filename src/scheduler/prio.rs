use super::{Dispatch, DispatchError, EnqueueFlags, SchedParams, Scheduler, SimCtx, Slice};
use crate::core::{ProcessId, RqId};

/// Static priority scheduling; a lower `priority` value wins.
pub struct PrioScheduler<const PREEMPT: bool> {
    global_priq: RqId,
}

pub type PrioNonPreemptive = PrioScheduler<false>;
pub type PrioPreemptive = PrioScheduler<true>;

impl<const PREEMPT: bool> Scheduler for PrioScheduler<PREEMPT> {
    fn init(ctx: &mut SimCtx, _params: &SchedParams) -> Self {
        Self {
            global_priq: ctx.create_rq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, _flags: EnqueueFlags) {
        let priority = ctx.process(process).priority;
        ctx.rq_push_priq(self.global_priq, process, u64::from(priority));
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError> {
        let process = ctx
            .rq_pop(self.global_priq)
            .ok_or(DispatchError::NoRunnableProcess)?;
        let slice = if PREEMPT {
            Slice::Tick
        } else {
            Slice::ToCompletion
        };
        Ok(Dispatch { process, slice })
    }
}
