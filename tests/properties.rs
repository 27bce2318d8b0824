/*!
 * Property Tests
 * Invariants every policy must hold over arbitrary valid workloads
 */

use cpu_sched_sim::{
    Policy, ProcessDescriptor, SchedParams, SchedulingEngine, scheduler::mlq::tier_for,
};
use proptest::prelude::*;

fn workload_strategy() -> impl Strategy<Value = Vec<ProcessDescriptor>> {
    prop::collection::vec((0u64..=50, 1u64..=20, 0u32..=10), 0..16).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(pid, (arrival, burst, priority))| {
                ProcessDescriptor::new(pid as u64, arrival, burst, priority)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn every_process_completes_sanely(workload in workload_strategy(), quantum in 1u64..=5) {
        let engine = SchedulingEngine::new(workload, SchedParams { quantum }).unwrap();

        for (policy, run) in engine.run_all(&Policy::ALL) {
            let total_burst: u64 = run.processes.iter().map(|p| p.burst_time).sum();
            let mut makespan = 0;

            for process in &run.processes {
                let start = process.start_time.unwrap();
                let completion = process.completion_time.unwrap();
                prop_assert_eq!(process.remaining_time, 0, "{}", policy);
                prop_assert!(start >= process.arrival_time, "{}", policy);
                prop_assert!(completion >= start + process.burst_time, "{}", policy);
                prop_assert!(process.turnaround_time().unwrap() >= process.burst_time, "{}", policy);
                prop_assert!(process.waiting_time().is_some(), "{}", policy);
                makespan = makespan.max(completion);
            }

            // The clock only moves by executed slices and idle ticks
            if !run.processes.is_empty() {
                prop_assert_eq!(makespan, total_burst + run.stats.idle_ticks, "{}", policy);
            }

            let metrics = run.metrics();
            prop_assert!(metrics.avg_waiting_time >= 0.0);
            prop_assert!(metrics.cpu_utilization <= 100.0 + 1e-9, "{}", policy);
        }
    }

    #[test]
    fn non_preemptive_policies_run_bursts_contiguously(workload in workload_strategy()) {
        let engine = SchedulingEngine::new(workload, SchedParams::default()).unwrap();

        for policy in [Policy::Fcfs, Policy::Sjf, Policy::Prio] {
            let run = engine.run_policy(policy);
            for process in &run.processes {
                let span = process.completion_time.unwrap() - process.start_time.unwrap();
                prop_assert_eq!(span, process.burst_time, "{}", policy);
            }
            prop_assert_eq!(run.stats.preemptions, 0);
        }
    }

    #[test]
    fn multilevel_queue_tier_zero_never_yields(workload in workload_strategy(), quantum in 1u64..=5) {
        let engine = SchedulingEngine::new(workload, SchedParams { quantum }).unwrap();

        let run = engine.run_policy(Policy::Mlq);

        for process in run.processes.iter().filter(|p| tier_for(p.priority) == 0) {
            let span = process.completion_time.unwrap() - process.start_time.unwrap();
            prop_assert_eq!(span, process.burst_time);
        }
    }

    #[test]
    fn round_robin_with_large_quantum_matches_fcfs(workload in workload_strategy()) {
        let engine = SchedulingEngine::new(workload, SchedParams { quantum: 20 }).unwrap();

        let fcfs = engine.run_policy(Policy::Fcfs);
        let rr = engine.run_policy(Policy::Rr);

        let fcfs_done: Vec<_> = fcfs.processes.iter().map(|p| p.completion_time).collect();
        let rr_done: Vec<_> = rr.processes.iter().map(|p| p.completion_time).collect();
        prop_assert_eq!(fcfs_done, rr_done);
    }

    #[test]
    fn runs_are_reproducible(workload in workload_strategy()) {
        let engine = SchedulingEngine::new(workload, SchedParams::default()).unwrap();

        for policy in Policy::ALL {
            let first = engine.run_policy(policy).metrics();
            let second = engine.run_policy(policy).metrics();
            prop_assert_eq!(first, second, "{}", policy);
        }
    }
}
