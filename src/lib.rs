//! valkey-list-bench library
//!
//! List push/pop throughput benchmark for Valkey and Redis.

pub mod benchmark;
pub mod client;
pub mod config;
pub mod utils;
