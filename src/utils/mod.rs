//! Utility modules

pub mod error;
pub mod resp;

pub use error::{BenchmarkError, ConnectionError, PoolError, ProtocolError, Result};
pub use resp::{RespDecoder, RespEncoder, RespValue};
