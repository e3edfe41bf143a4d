//! List push/pop worker
//!
//! Each worker owns one list key. It pushes `num_elems` copies of the
//! payload with RPUSH, then pops the same number with LPOP. The first
//! failure stops the worker; nothing is retried. A connection that failed
//! at the I/O level flags itself broken and the pool discards it.
//!
//! Both commands are encoded once up front and the same bytes are resent
//! for every request.

use std::fmt;

use tracing::{error, info};

use super::counters::RunCounters;
use crate::client::{expect_pop_reply, expect_push_reply, ConnectionPool, ControlPlane};
use crate::config::BenchmarkConfig;
use crate::utils::{BenchmarkError, PoolError, RespEncoder};

/// Namespace for per-worker list keys
pub const KEY_PREFIX: &str = "benchmark:list:";

/// Filler byte for payloads
pub const PAYLOAD_BYTE: u8 = b'x';

/// List key owned by a worker
pub fn worker_key(worker_id: usize) -> String {
    format!("{}{}", KEY_PREFIX, worker_id)
}

/// Payload of exactly `size` filler bytes
pub fn make_payload(size: usize) -> Vec<u8> {
    vec![PAYLOAD_BYTE; size]
}

/// Stage at which a worker stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Acquire,
    Push,
    Pop,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Acquire => "Acquire",
            Phase::Push => "Push",
            Phase::Pop => "Pop",
        };
        f.write_str(name)
    }
}

/// Why a worker stopped early
#[derive(Debug)]
pub struct WorkerFailure {
    pub phase: Phase,
    pub error: BenchmarkError,
}

/// Result from a worker thread
#[derive(Debug)]
pub struct WorkerResult {
    pub worker_id: usize,
    pub key: String,
    pub pushes: u64,
    pub pops: u64,
    pub failure: Option<WorkerFailure>,
}

/// One worker's fixed push/pop sequence
pub struct ListWorker {
    id: usize,
    key: String,
    num_elems: u64,
    payload_len: usize,
    push_cmd: RespEncoder,
    pop_cmd: RespEncoder,
}

impl ListWorker {
    pub fn new(id: usize, config: &BenchmarkConfig) -> Self {
        let key = worker_key(id);
        let payload = make_payload(config.packet_size);

        let mut push_cmd = RespEncoder::with_capacity(payload.len() + key.len() + 64);
        push_cmd.encode_command(&[b"RPUSH", key.as_bytes(), &payload]);

        let mut pop_cmd = RespEncoder::with_capacity(key.len() + 32);
        pop_cmd.encode_command(&[b"LPOP", key.as_bytes()]);

        Self {
            id,
            key,
            num_elems: config.num_elems,
            payload_len: payload.len(),
            push_cmd,
            pop_cmd,
        }
    }

    /// Run the push phase then the pop phase on one pooled connection
    pub fn run(&self, pool: &ConnectionPool, counters: &RunCounters) -> WorkerResult {
        info!(
            "Starting worker {}, key: {}, data len: {}",
            self.id, self.key, self.payload_len
        );

        let mut result = WorkerResult {
            worker_id: self.id,
            key: self.key.clone(),
            pushes: 0,
            pops: 0,
            failure: None,
        };

        match self.push_pop(pool, counters, &mut result) {
            Ok(()) => info!("Worker {} completed", self.id),
            Err(failure) => {
                error!("Worker {}: {} error: {}", self.id, failure.phase, failure.error);
                counters.record_error();
                result.failure = Some(failure);
            }
        }

        counters.worker_finished();
        result
    }

    fn push_pop(
        &self,
        pool: &ConnectionPool,
        counters: &RunCounters,
        result: &mut WorkerResult,
    ) -> Result<(), WorkerFailure> {
        let mut conn = pool.get().map_err(|e| WorkerFailure {
            phase: Phase::Acquire,
            error: PoolError::Checkout(e).into(),
        })?;

        for _ in 0..self.num_elems {
            conn.execute_encoded(&self.push_cmd)
                .map_err(BenchmarkError::from)
                .and_then(expect_push_reply)
                .map_err(|error| WorkerFailure {
                    phase: Phase::Push,
                    error,
                })?;
            result.pushes += 1;
            counters.record_ops(1);
        }

        for _ in 0..self.num_elems {
            conn.execute_encoded(&self.pop_cmd)
                .map_err(BenchmarkError::from)
                .and_then(expect_pop_reply)
                .map_err(|error| WorkerFailure {
                    phase: Phase::Pop,
                    error,
                })?;
            result.pops += 1;
            counters.record_ops(1);
        }

        Ok(())
    }
}
