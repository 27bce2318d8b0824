use std::{collections::BTreeMap, io::Write};

use serde::Serialize;

use super::{driver::RunResult, metrics::Metrics};
use crate::{error::SimResult, scheduler::Policy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

#[derive(Serialize)]
struct PolicyReport<'a> {
    policy: &'static str,
    #[serde(flatten)]
    metrics: &'a Metrics,
}

/// Render the per-policy metrics, in policy order.
pub fn report_results<W: Write>(
    out: &mut W,
    results: &BTreeMap<Policy, Metrics>,
    format: ReportFormat,
) -> SimResult<()> {
    match format {
        ReportFormat::Table => write_table(out, results)?,
        ReportFormat::Json => {
            let reports: Vec<PolicyReport<'_>> = results
                .iter()
                .map(|(policy, metrics)| PolicyReport {
                    policy: policy.name(),
                    metrics,
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &reports)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, results: &BTreeMap<Policy, Metrics>) -> std::io::Result<()> {
    writeln!(out, "\nSimulation Results:")?;
    writeln!(out, "{}", "-".repeat(80))?;
    for (policy, metrics) in results {
        writeln!(out, "\n{policy}:")?;
        writeln!(
            out,
            "Average Turnaround Time: {:.2} ticks",
            metrics.avg_turnaround_time
        )?;
        writeln!(out, "Average Waiting Time: {:.2} ticks", metrics.avg_waiting_time)?;
        writeln!(out, "Average Response Time: {:.2} ticks", metrics.avg_response_time)?;
        writeln!(out, "CPU Utilization: {:.2}%", metrics.cpu_utilization)?;
        writeln!(out, "Throughput: {:.4} processes/tick", metrics.throughput)?;
    }
    Ok(())
}

/// Per-process timeline of one run, in workload order.
pub fn report_timeline<W: Write>(out: &mut W, policy: Policy, run: &RunResult) -> SimResult<()> {
    writeln!(out, "\n{policy} timeline:")?;
    writeln!(
        out,
        "{:>5} {:>8} {:>6} {:>5} {:>6} {:>8} {:>11} {:>8}",
        "pid", "arrival", "burst", "prio", "start", "finish", "turnaround", "waiting"
    )?;
    for process in &run.processes {
        writeln!(
            out,
            "{:>5} {:>8} {:>6} {:>5} {:>6} {:>8} {:>11} {:>8}",
            process.pid,
            process.arrival_time,
            process.burst_time,
            process.priority,
            fmt_tick(process.start_time),
            fmt_tick(process.completion_time),
            fmt_tick(process.turnaround_time()),
            fmt_tick(process.waiting_time()),
        )?;
    }
    writeln!(
        out,
        "idle ticks: {}, dispatches: {}, preemptions: {}",
        run.stats.idle_ticks, run.stats.dispatches, run.stats.preemptions
    )?;
    Ok(())
}

fn fmt_tick(tick: Option<u64>) -> String {
    tick.map_or_else(|| "-".to_string(), |t| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BTreeMap<Policy, Metrics> {
        let mut results = BTreeMap::new();
        results.insert(
            Policy::Rr,
            Metrics {
                avg_turnaround_time: 7.5,
                avg_waiting_time: 2.0,
                avg_response_time: 1.0,
                throughput: 0.25,
                cpu_utilization: 100.0,
            },
        );
        results.insert(Policy::Fcfs, Metrics::default());
        results
    }

    #[test]
    fn table_lists_policies_in_order() {
        let mut out = Vec::new();
        report_results(&mut out, &sample(), ReportFormat::Table).unwrap();
        let text = String::from_utf8(out).unwrap();

        let fcfs = text.find("FCFS:").unwrap();
        let rr = text.find("Round Robin:").unwrap();
        assert!(fcfs < rr);
        assert!(text.contains("Average Turnaround Time: 7.50 ticks"));
        assert!(text.contains("Throughput: 0.2500 processes/tick"));
    }

    #[test]
    fn json_is_an_ordered_array() {
        let mut out = Vec::new();
        report_results(&mut out, &sample(), ReportFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["policy"], "FCFS");
        assert_eq!(entries[1]["policy"], "Round Robin");
        assert_eq!(entries[1]["avg_waiting_time"], 2.0);
    }
}
