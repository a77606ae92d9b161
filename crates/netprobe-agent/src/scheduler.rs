//! Periodic sweeps and per-target fan-out.
//!
//! Each [`Sweep`] gets its own timer thread. On every tick the scheduler
//! starts one task per target through a [`TaskSpawner`] and returns without
//! waiting for any of them. Tasks are never joined or cancelled.

use crate::task::Prober;
use anyhow::{Context, Result};
use netprobe_probe::DiagnosticKind;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const REACHABILITY_INTERVAL: Duration = Duration::from_secs(30);
pub const PATH_INTERVAL: Duration = Duration::from_secs(60);

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Starts tasks without keeping a way to join them.
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, name: String, task: Task);
}

/// One detached OS thread per task.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSpawner;

impl TaskSpawner for ThreadSpawner {
    fn spawn(&self, name: String, task: Task) {
        // Thread names must not contain NUL; targets come from the registry.
        let name = name.replace('\0', "?");
        if let Err(err) = thread::Builder::new().name(name.clone()).spawn(task) {
            log::warn!("failed to start task {name}: {err}");
        }
    }
}

/// Runs each task on the calling thread before returning.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSpawner;

impl TaskSpawner for InlineSpawner {
    fn spawn(&self, _name: String, task: Task) {
        task();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    pub kind: DiagnosticKind,
    pub interval: Duration,
}

impl Sweep {
    pub fn new(kind: DiagnosticKind, interval: Duration) -> Self {
        Self { kind, interval }
    }

    pub fn defaults() -> [Sweep; 2] {
        [
            Sweep::new(DiagnosticKind::Reachability, REACHABILITY_INTERVAL),
            Sweep::new(DiagnosticKind::Path, PATH_INTERVAL),
        ]
    }
}

pub struct Scheduler {
    prober: Arc<Prober>,
    targets: Arc<[String]>,
    spawner: Arc<dyn TaskSpawner>,
}

impl Scheduler {
    pub fn new(
        prober: Arc<Prober>,
        targets: impl Into<Arc<[String]>>,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Self {
        Self {
            prober,
            targets: targets.into(),
            spawner,
        }
    }

    /// Starts one task per target and returns how many were started.
    pub fn sweep(&self, kind: DiagnosticKind) -> usize {
        log::info!("started {kind} sweep over {} targets", self.targets.len());

        for target in self.targets.iter() {
            log::info!("{kind} ====> {target}");
            let prober = Arc::clone(&self.prober);
            let target = target.clone();
            self.spawner.spawn(
                format!("{kind}-{target}"),
                Box::new(move || prober.probe(kind, &target)),
            );
        }

        log::info!("ended {kind} sweep");
        self.targets.len()
    }

    /// Starts the default reachability and path timers.
    pub fn start(self: &Arc<Self>) -> Result<Vec<JoinHandle<()>>> {
        self.start_with(&Sweep::defaults())
    }

    /// Starts one timer thread per sweep. The first tick of each fires one
    /// interval after this call.
    pub fn start_with(self: &Arc<Self>, sweeps: &[Sweep]) -> Result<Vec<JoinHandle<()>>> {
        sweeps
            .iter()
            .map(|sweep| {
                let scheduler = Arc::clone(self);
                let sweep = *sweep;
                log::info!("added {} sweep every {:?}", sweep.kind, sweep.interval);
                thread::Builder::new()
                    .name(format!("{}-timer", sweep.kind))
                    .spawn(move || scheduler.tick_forever(sweep))
                    .with_context(|| format!("failed to start {} timer", sweep.kind))
            })
            .collect()
    }

    fn tick_forever(&self, sweep: Sweep) {
        let mut next = Instant::now() + sweep.interval;
        loop {
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            }
            self.sweep(sweep.kind);
            next += sweep.interval;
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("prober", &self.prober)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}
