//! Per-run atomic counters
//!
//! The only state workers share besides the connection pool. A fresh
//! set is created for every run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the workers of one run
#[derive(Debug, Default)]
pub struct RunCounters {
    /// Commands that received a successful reply
    pub ops_completed: AtomicU64,

    /// Workers that stopped early on an error
    pub error_count: AtomicU64,

    /// Workers that returned, successfully or not
    pub workers_finished: AtomicU64,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record completed commands
    #[inline]
    pub fn record_ops(&self, count: u64) {
        self.ops_completed.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a failed worker
    #[inline]
    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Mark one worker as done
    #[inline]
    pub fn worker_finished(&self) {
        self.workers_finished.fetch_add(1, Ordering::Release);
    }

    pub fn ops(&self) -> u64 {
        self.ops_completed.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn finished(&self) -> u64 {
        self.workers_finished.load(Ordering::Acquire)
    }
}
