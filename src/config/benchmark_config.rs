//! Benchmark configuration derived from CLI arguments

use super::cli::CliArgs;
use std::fmt;
use std::time::Duration;

/// Idle connections older than this are discarded by the pool
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(240);

/// Resolved server address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Complete benchmark configuration
///
/// Built once at startup and shared read-only by every component.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    // Connection
    pub address: ServerAddress,
    pub password: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub idle_timeout: Duration,

    // Workload
    pub threads: u32,
    pub num_elems: u64,
    pub packet_size: usize,

    // Runs
    pub interval: Duration,
    pub run_count: u32,

    // Output
    pub quiet: bool,
    pub verbose: bool,
}

impl BenchmarkConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        let password = if args.password.is_empty() {
            None
        } else {
            Some(args.password.clone())
        };

        let request_timeout = if args.request_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(args.request_timeout_ms))
        };

        Self {
            address: ServerAddress {
                host: args.host.clone(),
                port: args.port,
            },
            password,
            connect_timeout: Duration::from_millis(args.connect_timeout_ms),
            request_timeout,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,

            threads: args.threads,
            num_elems: args.num_elems,
            packet_size: args.packet_size,

            interval: Duration::from_secs(args.interval_secs),
            run_count: args.run_count,

            quiet: args.quiet,
            verbose: args.verbose,
        }
    }

    /// Pool capacity: one connection per worker plus one spare
    pub fn pool_size(&self) -> u32 {
        self.threads.saturating_add(1)
    }

    /// Operations one run issues when nothing fails (push + pop per element)
    pub fn total_ops(&self) -> u64 {
        u64::from(self.threads)
            .saturating_mul(self.num_elems)
            .saturating_mul(2)
    }
}
