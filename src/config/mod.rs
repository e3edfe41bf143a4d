//! Configuration module

pub mod benchmark_config;
pub mod cli;

pub use benchmark_config::{BenchmarkConfig, ServerAddress, DEFAULT_IDLE_TIMEOUT};
pub use cli::CliArgs;
