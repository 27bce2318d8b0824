pub mod driver;
pub mod engine;
pub mod metrics;
pub mod report;
pub mod workload;

pub use driver::{RunResult, Sim};
pub use engine::SchedulingEngine;
pub use metrics::{Metrics, compute_metrics};
pub use report::{ReportFormat, report_results, report_timeline};
pub use workload::{ProcessDescriptor, generate_workload, load_workload, validate_workload};
