//! Bounded-queue worker pool and dispatch driver.
//!
//! One producer (the driver, enumerating candidate files) feeds a shared
//! bounded channel; N worker threads compete for tasks, each running one
//! tool subprocess at a time to completion and emitting its report block
//! under the shared output lock. The channel capacity equals the worker
//! count, so enumeration stalls once workers fall N tasks behind.

use std::process::Command;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::command;
use crate::file_finder::FileFinder;
use crate::output::{Reporter, reconcile};
use crate::{DispatchRules, DriverConfig, DriverError, OverrideTable};

/// Per-worker counters, reported in worker index order.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkerStats {
    /// Tasks this worker ran to completion.
    pub files_processed: u64,
    /// Tasks whose tool exited non-zero. Expected for files with findings;
    /// informational only.
    pub tool_failures: u64,
}

/// Aggregated result of a completed dispatch.
#[derive(Debug)]
pub struct DispatchReport {
    /// Tasks pushed onto the queue by the driver.
    pub files_enqueued: u64,
    /// Per-worker stats in worker index order.
    pub worker_stats: Vec<WorkerStats>,
    /// End-to-end wall time.
    pub wall_time: Duration,
}

impl DispatchReport {
    /// Total tasks completed across all workers.
    pub fn files_processed(&self) -> u64 {
        self.worker_stats.iter().map(|s| s.files_processed).sum()
    }

    /// Total non-zero tool exits across all workers.
    pub fn tool_failures(&self) -> u64 {
        self.worker_stats.iter().map(|s| s.tool_failures).sum()
    }
}

/// Drives one dispatch run: owns the queue lifecycle, starts the workers,
/// feeds tasks and waits for the drain.
pub struct Dispatcher {
    config: Arc<DriverConfig>,
    finder: FileFinder,
    overrides: Arc<OverrideTable>,
    reporter: Arc<Reporter>,
}

impl Dispatcher {
    /// Creates a dispatcher from a validated configuration and rules.
    ///
    /// Preconditions (root and build path exist, tool resolves, jobs >= 1)
    /// are the host's job; nothing is re-validated here.
    pub fn new(config: DriverConfig, rules: &DispatchRules, reporter: Arc<Reporter>) -> Self {
        let finder = FileFinder::new(config.root.clone(), rules);
        let overrides = Arc::new(OverrideTable::new(rules.overrides.clone()));
        Self {
            config: Arc::new(config),
            finder,
            overrides,
            reporter,
        }
    }

    /// Runs the dispatch to completion.
    ///
    /// Returns once every enqueued task has been processed, or with the
    /// first worker error (spawn failure, panic) after the queue drains.
    /// Non-zero tool exits never fail the run.
    pub fn run(&self) -> Result<DispatchReport, DriverError> {
        let worker_count = self.config.jobs.max(1);
        let wall_start = Instant::now();

        // Capacity equals the worker count; the feed loop below stalls
        // once workers fall that far behind.
        let (task_tx, task_rx) = crossbeam_channel::bounded::<String>(worker_count);

        let mut handles = Vec::with_capacity(worker_count);
        for worker_idx in 0..worker_count {
            let rx = task_rx.clone();
            let config = Arc::clone(&self.config);
            let overrides = Arc::clone(&self.overrides);
            let reporter = Arc::clone(&self.reporter);

            let handle = thread::Builder::new()
                .name(format!("tidy-worker-{}", worker_idx))
                .spawn(move || worker_loop(rx, &config, &overrides, &reporter))?;
            handles.push(handle);
        }

        // Workers hold the only receivers now; their exits disconnect the
        // channel for the feed loop below.
        drop(task_rx);

        let mut files_enqueued = 0u64;
        let mut walk_error = None;
        for task in self.finder.files() {
            let task = match task {
                Ok(task) => task,
                Err(e) => {
                    walk_error = Some(e);
                    break;
                }
            };
            // Blocks while the queue is at capacity; fails only when every
            // worker has exited, in which case their error surfaces below.
            if task_tx.send(task).is_err() {
                break;
            }
            files_enqueued += 1;
        }
        drop(task_tx);

        let mut worker_stats = Vec::with_capacity(worker_count);
        let mut first_error = None;
        for handle in handles {
            let name = handle
                .thread()
                .name()
                .unwrap_or("tidy-worker")
                .to_string();
            match handle.join() {
                Ok(Ok(stats)) => worker_stats.push(stats),
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(_) => {
                    first_error.get_or_insert(DriverError::WorkerPanic(name));
                }
            }
        }

        if let Some(e) = walk_error {
            return Err(e);
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let report = DispatchReport {
            files_enqueued,
            worker_stats,
            wall_time: wall_start.elapsed(),
        };
        info!(
            "Dispatched {} files across {} workers in {:.2?}",
            report.files_enqueued,
            report.worker_stats.len(),
            report.wall_time
        );
        Ok(report)
    }
}

/// One worker's task loop: recv, build, execute, report, repeat until the
/// channel disconnects. Never runs two subprocesses concurrently.
fn worker_loop(
    rx: Receiver<String>,
    config: &DriverConfig,
    overrides: &OverrideTable,
    reporter: &Reporter,
) -> Result<WorkerStats, DriverError> {
    let mut stats = WorkerStats::default();

    for task in rx.iter() {
        let suppressions = overrides.lookup(&task);
        let args = command::build_args(config, suppressions, &task);
        debug!("Running {} on {}", config.tool.display(), task);

        // Drains both streams to completion concurrently with the child.
        let output = match Command::new(&config.tool)
            .args(&args)
            .current_dir(&config.root)
            .output()
        {
            Ok(output) => output,
            Err(source) => {
                return Err(DriverError::Spawn {
                    tool: config.tool.clone(),
                    source,
                });
            }
        };

        if !output.status.success() {
            // Non-zero exit means findings, not a dispatch failure.
            stats.tool_failures += 1;
            debug!("{}: tool exited with {}", task, output.status);
        }

        let raw_stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let raw_stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let (stdout, stderr) = reconcile(raw_stdout, raw_stderr);

        let echo = command::command_line(&config.tool, &args);
        if let Err(e) = reporter.emit(&echo, &stdout, &stderr) {
            warn!("Failed to write report block for {}: {}", task, e);
        }

        stats.files_processed += 1;
    }

    Ok(stats)
}
