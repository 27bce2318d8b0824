use super::state::{ProcessState, SimCtx, Ticks};

/// Debug-build checker for the record-set invariants, run after every step.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    // remaining_time seen at the previous step, indexed by ProcessId
    last_remaining: Vec<Ticks>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        if self.last_remaining.len() != ctx.processes.len() {
            self.last_remaining = ctx.processes.iter().map(|p| p.burst_time).collect();
        }

        if let Some(id) = ctx.current {
            let process = ctx.process(id);
            debug_assert_eq!(
                process.state,
                ProcessState::Running,
                "current process {} must be Running",
                process.pid
            );
        }

        for process in &ctx.processes {
            debug_assert!(
                process.remaining_time <= self.last_remaining[process.id],
                "Process {} remaining time grew from {} to {}",
                process.pid,
                self.last_remaining[process.id],
                process.remaining_time
            );
            self.last_remaining[process.id] = process.remaining_time;

            if let Some(start) = process.start_time {
                debug_assert!(
                    start >= process.arrival_time,
                    "Process {} started at {start} before arriving at {}",
                    process.pid,
                    process.arrival_time
                );
            }

            if process.is_completed() {
                debug_assert_eq!(
                    process.state,
                    ProcessState::Completed,
                    "Process {} has a completion time but is {:?}",
                    process.pid,
                    process.state
                );
                debug_assert_eq!(
                    process.remaining_time, 0,
                    "Completed process {} has remaining time",
                    process.pid
                );
                debug_assert!(
                    process.waiting_time().is_some(),
                    "Completed process {} finished faster than its burst",
                    process.pid
                );
            }
        }

        for (&id, &rq_id) in &ctx.proc_to_rq {
            let process = ctx.process(id);
            debug_assert_eq!(
                process.state,
                ProcessState::Ready,
                "Process {} in ready queue {rq_id:?} must be Ready",
                process.pid
            );
            if let Some(rq) = ctx.rqs.get(rq_id) {
                debug_assert!(
                    rq.contains(id),
                    "proc_to_rq claims process {id} in {rq_id:?}, but queue does not contain it"
                );
            } else {
                debug_assert!(false, "proc_to_rq references unknown ready queue {rq_id:?}");
            }
        }
    }
}
