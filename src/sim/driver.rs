use serde::Serialize;
use tracing::trace;

use super::metrics::{Metrics, compute_metrics};
use crate::{
    core::{
        Process, ProcessId, SchedCoreEvent,
        driver::{RunStats, SchedCore},
    },
    scheduler::{SchedParams, Scheduler},
};

/// Final record set of one policy run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub processes: Vec<Process>,
    pub stats: RunStats,
}

impl RunResult {
    pub fn metrics(&self) -> Metrics {
        compute_metrics(&self.processes)
    }
}

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    // ProcessIds ordered by arrival time, then workload order
    arrivals: Vec<ProcessId>,
    arrival_cursor: usize,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(processes: Vec<Process>, params: &SchedParams) -> Self {
        let mut arrivals: Vec<ProcessId> = (0..processes.len()).collect();
        arrivals.sort_by_key(|&id| processes[id].arrival_time);

        Self {
            core: SchedCore::<S>::new(processes, params),
            arrivals,
            arrival_cursor: 0,
        }
    }

    /// Admit everything that has arrived, then make one scheduling decision.
    pub fn step(&mut self) -> Vec<SchedCoreEvent> {
        let mut events = self.handle_arrivals();
        events.extend(self.core.step());
        events
    }

    fn handle_arrivals(&mut self) -> Vec<SchedCoreEvent> {
        let now = self.core.now();
        let ctx = &self.core.ctx;
        let arrived = self.arrivals[self.arrival_cursor..]
            .iter()
            .take_while(|&&id| ctx.process(id).arrival_time <= now) // Contiguous, since arrivals are sorted
            .count();

        // A batch spanning several arrival times is admitted in workload order
        let mut batch = self.arrivals[self.arrival_cursor..self.arrival_cursor + arrived].to_vec();
        batch.sort_unstable();
        self.arrival_cursor += arrived;

        batch.into_iter().map(|id| self.core.admit(id)).collect()
    }

    pub fn all_processes_completed(&self) -> bool {
        self.arrival_cursor == self.arrivals.len() && self.core.ctx.all_completed()
    }

    pub fn run(mut self) -> RunResult {
        while !self.all_processes_completed() {
            let now = self.core.now();
            for event in self.step() {
                trace!(now, ?event, "sched event");
            }
        }

        let stats = self.core.stats();
        RunResult {
            processes: self.core.into_processes(),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FcfsScheduler;
    use crate::sim::ProcessDescriptor;

    fn records(descs: &[ProcessDescriptor]) -> Vec<Process> {
        descs
            .iter()
            .enumerate()
            .map(|(id, desc)| desc.instantiate(id))
            .collect()
    }

    #[test]
    fn batch_admission_follows_workload_order() {
        // Both have arrived by the time pid 0 finishes; pid 2 arrived first
        // but sits later in the workload.
        let descs = [
            ProcessDescriptor::new(0, 0, 6, 0),
            ProcessDescriptor::new(1, 4, 1, 0),
            ProcessDescriptor::new(2, 2, 1, 0),
        ];
        let result = Sim::<FcfsScheduler>::new(records(&descs), &SchedParams::default()).run();

        let completion: Vec<_> = result
            .processes
            .iter()
            .map(|p| p.completion_time)
            .collect();
        assert_eq!(completion, vec![Some(6), Some(7), Some(8)]);
    }

    #[test]
    fn leading_idle_ticks_are_counted() {
        let descs = [ProcessDescriptor::new(0, 3, 2, 0)];
        let result = Sim::<FcfsScheduler>::new(records(&descs), &SchedParams::default()).run();

        assert_eq!(result.stats.idle_ticks, 3);
        assert_eq!(result.processes[0].start_time, Some(3));
        assert_eq!(result.processes[0].completion_time, Some(5));
    }

    #[test]
    fn empty_workload_finishes_immediately() {
        let result = Sim::<FcfsScheduler>::new(Vec::new(), &SchedParams::default()).run();
        assert!(result.processes.is_empty());
        assert_eq!(result.metrics(), Metrics::default());
    }
}
