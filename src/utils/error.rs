//! Error types for valkey-list-bench

use std::io;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Connection-related errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        host: String,
        port: u16,
        source: io::Error,
    },

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Server did not answer PING with PONG")]
    PingFailed,

    #[error("Connection I/O error: {0}")]
    Io(#[from] io::Error),
}

/// RESP protocol errors
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Unexpected response: expected {expected}, got {actual}")]
    UnexpectedResponse { expected: String, actual: String },

    #[error("Server error: {0}")]
    ServerError(String),
}

/// Connection pool errors
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Failed to build connection pool: {0}")]
    Build(r2d2::Error),

    #[error("Failed to check out connection: {0}")]
    Checkout(r2d2::Error),
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
