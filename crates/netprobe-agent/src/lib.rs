//! Probe agent: configuration, target registry, probe tasks and sweeps.

pub mod config;
pub mod registry;
pub mod scheduler;
pub mod task;

pub use config::{parse_log_level, Config, DEFAULT_CONFIG_PATH};
pub use registry::{fetch_targets, parse_targets};
pub use scheduler::{
    InlineSpawner, Scheduler, Sweep, TaskSpawner, ThreadSpawner, PATH_INTERVAL,
    REACHABILITY_INTERVAL,
};
pub use task::Prober;
