use super::{Dispatch, DispatchError, EnqueueFlags, SchedParams, Scheduler, SimCtx, Slice};
use crate::core::{ProcessId, RqId, Ticks};

/// Round robin: one FIFO, slices of at most `quantum` ticks. A process whose
/// quantum expires is appended to the back; processes that arrived during its
/// slice are admitted after it.
pub struct RrScheduler {
    fifo: RqId,
    quantum: Ticks,
}

impl Scheduler for RrScheduler {
    fn init(ctx: &mut SimCtx, params: &SchedParams) -> Self {
        Self {
            fifo: ctx.create_rq_fifo(),
            quantum: params.quantum,
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
            slice: Slice::Quantum(self.quantum),
        })
    }
}
