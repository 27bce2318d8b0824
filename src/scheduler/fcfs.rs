use super::{Dispatch, DispatchError, EnqueueFlags, SchedParams, Scheduler, SimCtx, Slice};
use crate::core::{ProcessId, RqId};

/// First come, first served: one FIFO, every process runs to completion.
pub struct FcfsScheduler {
    fifo: RqId,
}

impl Scheduler for FcfsScheduler {
    fn init(ctx: &mut SimCtx, _params: &SchedParams) -> Self {
        Self {
            fifo: ctx.create_rq_fifo(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, _flags: EnqueueFlags) {
        ctx.rq_push_fifo(self.fifo, process);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Dispatch, DispatchError> {
        let process = ctx
            .rq_pop(self.fifo)
            .ok_or(DispatchError::NoRunnableProcess)?;
        Ok(Dispatch {
            process,
            slice: Slice::ToCompletion,
        })
    }
}
