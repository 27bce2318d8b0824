pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;
pub mod telemetry;

pub use crate::core::{Process, SchedCoreEvent};
pub use error::{SimError, SimResult};
pub use scheduler::{Policy, SchedParams, Scheduler};
pub use sim::{Metrics, ProcessDescriptor, RunResult, SchedulingEngine, Sim};
