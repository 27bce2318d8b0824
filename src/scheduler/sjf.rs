use super::{Dispatch, DispatchError, EnqueueFlags, SchedParams, Scheduler, SimCtx, Slice};
use crate::core::{ProcessId, RqId};

/// Shortest job first over an ordered pool keyed by remaining time.
///
/// The non-preemptive form runs the selected process to completion. The
/// preemptive form (shortest remaining time first) runs one tick at a time and
/// puts the process back into the pool, so a shorter arrival takes over on
/// the next tick.
pub struct SjfScheduler<const PREEMPT: bool> {
    pool: RqId,
}

pub type SjfNonPreemptive = SjfScheduler<false>;
pub type SjfPreemptive = SjfScheduler<true>;

impl<const PREEMPT: bool> Scheduler for SjfScheduler<PREEMPT> {
    fn init(ctx: &mut SimCtx, _params: &SchedParams) -> Self {
        Self {
            pool: ctx.create_rq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, _flags: EnqueueFlags) {
        let remaining = ctx.process(process).remaining_time;
        ctx.rq_push_priq(self.pool, process, remaining);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError> {
        let process = ctx
            .rq_pop(self.pool)
            .ok_or(DispatchError::NoRunnableProcess)?;
        let slice = if PREEMPT {
            Slice::Tick
        } else {
            Slice::ToCompletion
        };
        Ok(Dispatch { process, slice })
    }
}
