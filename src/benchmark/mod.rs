//! Benchmark orchestration and workers
//!
//! - RunCounters: atomic counters shared by the workers of one run
//! - ListWorker: per-thread RPUSH/LPOP sequence against its own key
//! - Orchestrator: runs workers, joins them and reports throughput

pub mod counters;
pub mod orchestrator;
pub mod worker;

#[cfg(test)]
pub(crate) mod mock_server;

pub use counters::RunCounters;
pub use orchestrator::{format_count, throughput, Orchestrator, RunResult};
pub use worker::{make_payload, worker_key, ListWorker, Phase, WorkerFailure, WorkerResult};
