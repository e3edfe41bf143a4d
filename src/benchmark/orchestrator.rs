//! Benchmark orchestrator
//!
//! Owns the connection pool, launches one thread per worker for each run,
//! joins them and turns the elapsed time into a throughput figure.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use super::counters::RunCounters;
use super::worker::{ListWorker, WorkerResult};
use crate::client::{build_pool, ConnectionFactory, ConnectionPool, ControlPlaneExt, PoolConfig};
use crate::config::BenchmarkConfig;
use crate::utils::{ConnectionError, PoolError, Result};

/// Outcome of one run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// 1-based run number
    pub run_index: u32,
    /// threads * elements * 2, regardless of failures
    pub total_ops: u64,
    /// Commands that actually got a successful reply
    pub completed_ops: u64,
    /// Workers that stopped early or never ran
    pub error_count: u64,
    pub duration: Duration,
    /// total_ops per second of wall-clock time
    pub throughput: f64,
}

impl RunResult {
    pub fn print_summary(&self) {
        println!(
            "Completed {} operations in {:.2} seconds",
            self.total_ops,
            self.duration.as_secs_f64()
        );
        println!("Operations per second: {:.2}", self.throughput);

        if self.error_count > 0 {
            warn!(
                "{} worker(s) stopped early: {} of {} operations completed",
                self.error_count,
                format_count(self.completed_ops),
                format_count(self.total_ops)
            );
        }
    }
}

/// Benchmark orchestrator
pub struct Orchestrator {
    config: Arc<BenchmarkConfig>,
    pool: ConnectionPool,
}

impl Orchestrator {
    /// Create the pool and verify the server answers PING
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        let pool = build_pool(
            ConnectionFactory::from_config(&config),
            PoolConfig::from_config(&config),
        )?;
        let orchestrator = Self {
            config: Arc::new(config),
            pool,
        };

        orchestrator.check_connection()?;
        Ok(orchestrator)
    }

    fn check_connection(&self) -> Result<()> {
        let mut conn = self.pool.get().map_err(PoolError::Checkout)?;
        if !conn.ping()? {
            return Err(ConnectionError::PingFailed.into());
        }
        debug!("Connected to {}", self.config.address);
        Ok(())
    }

    /// Launch all workers, wait for every one of them, measure the run
    pub fn run_once(&self, run_index: u32) -> RunResult {
        let counters = Arc::new(RunCounters::new());

        let start_time = Instant::now();

        let results = launch_and_join(self.config.threads as usize, &counters, |worker_id| {
            let worker = ListWorker::new(worker_id, &self.config);
            let pool = self.pool.clone();
            let counters = Arc::clone(&counters);

            thread::Builder::new()
                .name(format!("list-worker-{}", worker_id))
                .spawn(move || worker.run(&pool, &counters))
        });

        let duration = start_time.elapsed();

        for result in &results {
            debug!(
                "Worker {} ({}): {} pushes, {} pops",
                result.worker_id, result.key, result.pushes, result.pops
            );
        }
        debug!(
            "Run {}: {} of {} workers finished, pool {:?}",
            run_index,
            counters.finished(),
            self.config.threads,
            self.pool.state()
        );

        let total_ops = self.config.total_ops();
        RunResult {
            run_index,
            total_ops,
            completed_ops: counters.ops(),
            error_count: counters.errors(),
            duration,
            throughput: throughput(total_ops, duration),
        }
    }

    /// Run the configured number of times, sleeping between runs
    pub fn run_all(&self) -> Vec<RunResult> {
        self.run_all_with(thread::sleep)
    }

    /// `run_all` with an injectable sleep
    pub fn run_all_with<F>(&self, mut sleep: F) -> Vec<RunResult>
    where
        F: FnMut(Duration),
    {
        let run_count = self.config.run_count;
        let mut results = Vec::with_capacity(run_count as usize);

        for run_index in 1..=run_count {
            info!("Test run {} of {}", run_index, run_count);
            let result = self.run_once(run_index);
            result.print_summary();
            results.push(result);

            // No sleep after the last run
            if run_index == run_count {
                break;
            }
            println!("Sleeping for {} seconds...", self.config.interval.as_secs());
            sleep(self.config.interval);
        }

        results
    }
}

/// Spawn `count` workers and join every one that started.
///
/// A failed spawn stops further launches and counts as one worker error;
/// the workers already running are still joined. A panicked worker counts
/// as an error and contributes no result.
fn launch_and_join<S>(count: usize, counters: &RunCounters, mut spawn: S) -> Vec<WorkerResult>
where
    S: FnMut(usize) -> io::Result<JoinHandle<WorkerResult>>,
{
    let mut handles = Vec::with_capacity(count);

    for worker_id in 0..count {
        match spawn(worker_id) {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                error!("Failed to spawn worker {}: {}", worker_id, e);
                counters.record_error();
                break;
            }
        }
    }

    handles
        .into_iter()
        .filter_map(|handle| match handle.join() {
            Ok(result) => Some(result),
            Err(_) => {
                error!("Worker thread panicked");
                counters.record_error();
                None
            }
        })
        .collect()
}

/// Operations per second; 0.0 when no time elapsed
pub fn throughput(ops: u64, duration: Duration) -> f64 {
    let secs = duration.as_secs_f64();
    if secs > 0.0 {
        ops as f64 / secs
    } else {
        0.0
    }
}

/// Format large numbers with thousands separators
/// Examples: 1,234,567 or 987,654
pub fn format_count(value: u64) -> String {
    let s = value.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}
