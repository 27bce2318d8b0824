use std::collections::BTreeMap;

use tracing::{debug, info};

use super::{
    driver::{RunResult, Sim},
    workload::{ProcessDescriptor, validate_workload},
};
use crate::{
    core::Process,
    error::{SimError, SimResult},
    scheduler::{
        FcfsScheduler, MlqScheduler, Policy, PrioNonPreemptive, PrioPreemptive, RrScheduler,
        SchedParams, Scheduler, SjfNonPreemptive, SjfPreemptive,
    },
};

/// Runs scheduling policies over one fixed, validated workload.
///
/// Every run starts from [`SchedulingEngine::reset`], so each policy gets its
/// own record set and nothing carries over between runs.
#[derive(Debug, Clone)]
pub struct SchedulingEngine {
    workload: Vec<ProcessDescriptor>,
    params: SchedParams,
}

impl SchedulingEngine {
    pub fn new(workload: Vec<ProcessDescriptor>, params: SchedParams) -> SimResult<Self> {
        validate_workload(&workload)?;
        if params.quantum == 0 {
            return Err(SimError::InvalidQuantum(params.quantum));
        }
        Ok(Self { workload, params })
    }

    pub fn workload(&self) -> &[ProcessDescriptor] {
        &self.workload
    }

    pub fn params(&self) -> SchedParams {
        self.params
    }

    /// Fresh records for a new run, in workload order.
    pub fn reset(&self) -> Vec<Process> {
        self.workload
            .iter()
            .enumerate()
            .map(|(id, desc)| desc.instantiate(id))
            .collect()
    }

    pub fn run<S: Scheduler>(&self) -> RunResult {
        Sim::<S>::new(self.reset(), &self.params).run()
    }

    pub fn run_policy(&self, policy: Policy) -> RunResult {
        debug!(%policy, processes = self.workload.len(), quantum = self.params.quantum, "starting run");
        let result = match policy {
            Policy::Fcfs => self.run::<FcfsScheduler>(),
            Policy::Sjf => self.run::<SjfNonPreemptive>(),
            Policy::Srtf => self.run::<SjfPreemptive>(),
            Policy::Rr => self.run::<RrScheduler>(),
            Policy::Prio => self.run::<PrioNonPreemptive>(),
            Policy::PrioPreemptive => self.run::<PrioPreemptive>(),
            Policy::Mlq => self.run::<MlqScheduler>(),
        };

        let metrics = result.metrics();
        info!(
            %policy,
            avg_turnaround = metrics.avg_turnaround_time,
            avg_waiting = metrics.avg_waiting_time,
            throughput = metrics.throughput,
            cpu_utilization = metrics.cpu_utilization,
            idle_ticks = result.stats.idle_ticks,
            preemptions = result.stats.preemptions,
            "run complete"
        );
        result
    }

    pub fn run_all(&self, policies: &[Policy]) -> BTreeMap<Policy, RunResult> {
        policies
            .iter()
            .map(|&policy| (policy, self.run_policy(policy)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_quantum() {
        let workload = vec![ProcessDescriptor::new(0, 0, 1, 0)];
        let err = SchedulingEngine::new(workload, SchedParams { quantum: 0 }).unwrap_err();
        assert!(matches!(err, SimError::InvalidQuantum(0)));
    }

    #[test]
    fn rejects_invalid_descriptor() {
        let workload = vec![ProcessDescriptor::new(0, 0, 0, 0)];
        assert!(matches!(
            SchedulingEngine::new(workload, SchedParams::default()),
            Err(SimError::InvalidDescriptor { pid: 0, .. })
        ));
    }

    #[test]
    fn reset_produces_untouched_records() {
        let workload = vec![
            ProcessDescriptor::new(4, 2, 3, 1),
            ProcessDescriptor::new(1, 0, 5, 7),
        ];
        let engine = SchedulingEngine::new(workload, SchedParams::default()).unwrap();

        let first = engine.run_policy(Policy::Rr);
        assert!(first.processes.iter().all(|p| p.remaining_time == 0));

        let fresh = engine.reset();
        assert_eq!(fresh.len(), 2);
        for (id, process) in fresh.iter().enumerate() {
            assert_eq!(process.id, id);
            assert_eq!(process.remaining_time, process.burst_time);
            assert_eq!(process.start_time, None);
            assert_eq!(process.completion_time, None);
        }
    }

    #[test]
    fn run_all_keeps_requested_policies() {
        let workload = vec![ProcessDescriptor::new(0, 0, 2, 0)];
        let engine = SchedulingEngine::new(workload, SchedParams::default()).unwrap();

        let runs = engine.run_all(&[Policy::Mlq, Policy::Fcfs]);

        assert_eq!(runs.keys().copied().collect::<Vec<_>>(), vec![Policy::Fcfs, Policy::Mlq]);
    }
}
