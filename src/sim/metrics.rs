use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::Process;

/// Aggregate statistics for one completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub avg_turnaround_time: f64,
    pub avg_waiting_time: f64,
    pub avg_response_time: f64,
    /// Completed processes per tick
    pub throughput: f64,
    /// Percent of elapsed ticks spent executing bursts
    pub cpu_utilization: f64,
}

/// Summarize the completed records of a run. A run with nothing completed
/// yields all-zero metrics.
pub fn compute_metrics(processes: &[Process]) -> Metrics {
    let completed: Vec<&Process> = processes.iter().filter(|p| p.is_completed()).collect();

    let Some(max_completion) = completed.iter().filter_map(|p| p.completion_time).max() else {
        return Metrics::default();
    };
    if max_completion == 0 {
        return Metrics::default();
    }

    let total_burst: u64 = completed.iter().map(|p| p.burst_time).sum();
    let elapsed = max_completion as f64;

    Metrics {
        avg_turnaround_time: avg(completed.iter().filter_map(|p| p.turnaround_time())),
        avg_waiting_time: avg(completed.iter().filter_map(|p| p.waiting_time())),
        avg_response_time: avg(completed.iter().filter_map(|p| p.response_time())),
        throughput: completed.len() as f64 / elapsed,
        cpu_utilization: total_burst as f64 / elapsed * 100.0,
    }
}

fn avg(iter: impl Iterator<Item = u64>) -> f64 {
    iter.map(|v| v as f64).collect::<Mean>().estimate()
}
