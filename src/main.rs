use std::{collections::BTreeMap, io};

use anyhow::Context;
use clap::Parser;
use cpu_sched_sim::{
    Metrics, Policy, SchedulingEngine,
    config::{Cli, SimConfig},
    sim::{report_results, report_timeline},
    telemetry::init_tracing,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = SimConfig::try_from(cli).context("invalid configuration")?;
    let workload = config
        .load_workload()
        .context("failed to prepare workload")?;
    info!(
        processes = workload.len(),
        quantum = config.params.quantum,
        policies = config.policies.len(),
        "workload ready"
    );

    let engine = SchedulingEngine::new(workload, config.params).context("rejected workload")?;
    let runs = engine.run_all(&config.policies);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if config.verbose {
        for (policy, run) in &runs {
            report_timeline(&mut out, *policy, run)?;
        }
    }

    let results: BTreeMap<Policy, Metrics> = runs
        .iter()
        .map(|(policy, run)| (*policy, run.metrics()))
        .collect();
    report_results(&mut out, &results, config.format)?;

    Ok(())
}
