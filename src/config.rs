use std::path::PathBuf;

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    core::Ticks,
    error::{SimError, SimResult},
    scheduler::{Policy, SCHED_QUANTUM_DFL, SchedParams},
    sim::{ProcessDescriptor, ReportFormat, generate_workload, load_workload},
};

pub const DEFAULT_PROCESSES: usize = 20;

/// Compare CPU scheduling policies over one simulated workload
#[derive(Parser, Debug)]
#[command(name = "cpu-sched-sim")]
#[command(about = "Simulate CPU scheduling policies and compare their metrics", long_about = None)]
pub struct Cli {
    /// Number of processes to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_PROCESSES)]
    pub processes: usize,

    /// Time quantum for Round Robin and the lower Multilevel Queue tiers
    #[arg(short, long, default_value_t = SCHED_QUANTUM_DFL)]
    pub quantum: Ticks,

    /// Seed for the workload generator (random if omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Load the workload from a JSON file instead of generating it
    #[arg(short, long, conflicts_with_all = ["processes", "seed"])]
    pub workload: Option<PathBuf>,

    /// Policy to run; repeat for several (all policies if omitted)
    #[arg(short, long = "policy", value_enum)]
    pub policies: Vec<Policy>,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Also print each run's per-process timeline
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadSource {
    Random { count: usize, seed: Option<u64> },
    File(PathBuf),
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub workload: WorkloadSource,
    pub params: SchedParams,
    pub policies: Vec<Policy>,
    pub format: ReportFormat,
    pub verbose: bool,
}

impl TryFrom<Cli> for SimConfig {
    type Error = SimError;

    fn try_from(cli: Cli) -> SimResult<Self> {
        if cli.quantum == 0 {
            return Err(SimError::InvalidQuantum(cli.quantum));
        }

        let workload = match cli.workload {
            Some(path) => WorkloadSource::File(path),
            None => WorkloadSource::Random {
                count: cli.processes,
                seed: cli.seed,
            },
        };

        let mut policies = if cli.policies.is_empty() {
            Policy::ALL.to_vec()
        } else {
            cli.policies
        };
        policies.sort();
        policies.dedup();

        Ok(Self {
            workload,
            params: SchedParams {
                quantum: cli.quantum,
            },
            policies,
            format: if cli.json {
                ReportFormat::Json
            } else {
                ReportFormat::Table
            },
            verbose: cli.verbose,
        })
    }
}

impl SimConfig {
    pub fn load_workload(&self) -> SimResult<Vec<ProcessDescriptor>> {
        match &self.workload {
            WorkloadSource::File(path) => load_workload(path),
            WorkloadSource::Random { count, seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_os_rng(),
                };
                Ok(generate_workload(*count, &mut rng))
            }
        }
    }
}
