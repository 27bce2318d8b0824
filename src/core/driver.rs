use serde::Serialize;

use super::{
    event::SchedCoreEvent,
    observer::Observer,
    state::{Process, ProcessId, ProcessState, SimCtx, Ticks},
};
use crate::scheduler::{
    DispatchError, EnqueueFlags, SCHED_ENQ_PREEMPT, SCHED_ENQ_REENQ, SCHED_ENQ_WAKEUP,
    SchedParams, Scheduler,
};

/// Counters collected while a run executes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub idle_ticks: Ticks,
    pub dispatches: u64,
    // A requeued process lost the CPU to a different process
    pub preemptions: u64,
}

/// Single-CPU simulation core shared by every policy.
///
/// Each `step()` is one scheduling decision: ask the policy for a process,
/// run it for the slice the policy chose, then complete or requeue it. When
/// the policy has nothing ready the clock advances by one idle tick.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
    stats: RunStats,
    last_requeued: Option<ProcessId>,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(processes: Vec<Process>, params: &SchedParams) -> Self {
        let mut ctx = SimCtx::new(processes);
        let scheduler = S::init(&mut ctx, params);
        Self {
            ctx,
            scheduler,
            observer: Observer::new(),
            stats: RunStats::default(),
            last_requeued: None,
        }
    }

    /// Hand an arrived process to the policy for the first time.
    pub fn admit(&mut self, process: ProcessId) -> SchedCoreEvent {
        let from = self.ctx.mark_ready(process);
        debug_assert_eq!(
            from,
            ProcessState::Pending,
            "Process {process} admitted twice"
        );
        self.scheduler
            .enqueue(&mut self.ctx, process, SCHED_ENQ_WAKEUP);
        SchedCoreEvent::ProcessStateChange {
            pid: self.ctx.process(process).pid,
            from,
            to: ProcessState::Ready,
        }
    }

    pub fn step(&mut self) -> Vec<SchedCoreEvent> {
        let mut events = Vec::new();

        let dispatch = match self.scheduler.dispatch(&mut self.ctx) {
            Ok(dispatch) => dispatch,
            Err(DispatchError::NoRunnableProcess) => {
                self.ctx.advance_time(1);
                self.stats.idle_ticks += 1;
                events.push(SchedCoreEvent::CpuIdle);
                self.observer.observe(&self.ctx);
                return events;
            }
        };

        let current = dispatch.process;
        if let Some(prev) = self.last_requeued.take() {
            if prev != current {
                self.stats.preemptions += 1;
            }
        }

        // Stamps start_time on the first dispatch
        let from = self.ctx.set_running(current);
        self.stats.dispatches += 1;

        let process = self.ctx.process(current);
        let pid = process.pid;
        let ticks = dispatch.slice.ticks(process.remaining_time);
        debug_assert!(ticks > 0, "Dispatched process {pid} with an empty slice");

        events.push(SchedCoreEvent::ProcessStateChange {
            pid,
            from,
            to: ProcessState::Running,
        });
        events.push(SchedCoreEvent::Dispatch { pid, ticks });

        self.ctx.advance_time(ticks);
        let remaining = self.ctx.consume(current, ticks);

        if remaining == 0 {
            self.ctx.mark_completed(current, self.ctx.now);
            events.push(SchedCoreEvent::ProcessStateChange {
                pid,
                from: ProcessState::Running,
                to: ProcessState::Completed,
            });
        } else {
            let from = self.ctx.mark_ready(current);
            let flags: EnqueueFlags = SCHED_ENQ_PREEMPT | SCHED_ENQ_REENQ;
            self.scheduler.enqueue(&mut self.ctx, current, flags);
            self.last_requeued = Some(current);
            events.push(SchedCoreEvent::ProcessStateChange {
                pid,
                from,
                to: ProcessState::Ready,
            });
        }

        self.observer.observe(&self.ctx);
        events
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn into_processes(self) -> Vec<Process> {
        self.ctx.into_processes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{FcfsScheduler, RrScheduler};

    fn processes(bursts: &[Ticks]) -> Vec<Process> {
        bursts
            .iter()
            .enumerate()
            .map(|(id, &burst)| Process::new(id, id as u64, 0, burst, 0))
            .collect()
    }

    #[test]
    fn idle_step_advances_clock() {
        let mut core = SchedCore::<FcfsScheduler>::new(processes(&[3]), &SchedParams::default());

        let events = core.step();

        assert_eq!(events, vec![SchedCoreEvent::CpuIdle]);
        assert_eq!(core.now(), 1);
        assert_eq!(core.stats().idle_ticks, 1);
    }

    #[test]
    fn run_to_completion_slice() {
        let mut core = SchedCore::<FcfsScheduler>::new(processes(&[3]), &SchedParams::default());
        core.admit(0);

        let events = core.step();

        assert!(events.contains(&SchedCoreEvent::Dispatch { pid: 0, ticks: 3 }));
        assert_eq!(core.now(), 3);
        let process = core.ctx.process(0);
        assert_eq!(process.start_time, Some(0));
        assert_eq!(process.completion_time, Some(3));
        assert_eq!(process.state, ProcessState::Completed);
    }

    #[test]
    fn quantum_expiry_requeues_and_counts_preemption() {
        let mut core = SchedCore::<RrScheduler>::new(processes(&[3, 2]), &SchedParams { quantum: 2 });
        core.admit(0);
        core.admit(1);

        core.step();
        assert_eq!(core.ctx.process(0).remaining_time, 1);
        assert_eq!(core.ctx.process(0).state, ProcessState::Ready);

        core.step();
        assert_eq!(core.ctx.process(1).completion_time, Some(4));
        core.step();
        assert_eq!(core.ctx.process(0).completion_time, Some(5));

        assert!(core.ctx.all_completed());
        assert_eq!(core.stats().dispatches, 3);
        assert_eq!(core.stats().preemptions, 1);
        assert_eq!(core.observer().steps(), 3);
    }
}
