//! Command execution trait for server communication
//!
//! `ControlPlane` is the minimal execution surface a connection provides.
//! The RPUSH/LPOP reply interpreters live here so the worker loop can feed
//! replies from pre-encoded commands straight into them.

use crate::utils::{ProtocolError, RespEncoder, RespValue, Result};
use std::io;

/// Command execution trait
///
/// Implementations handle the underlying protocol and connection management.
pub trait ControlPlane {
    /// Execute a command with string arguments
    fn execute(&mut self, args: &[&str]) -> io::Result<RespValue>;

    /// Execute a pre-encoded RESP command
    ///
    /// Lets hot loops encode a command once and resend the same bytes.
    fn execute_encoded(&mut self, encoder: &RespEncoder) -> io::Result<RespValue>;
}

/// Extension trait for common commands
pub trait ControlPlaneExt: ControlPlane {
    /// Send PING and verify PONG response
    fn ping(&mut self) -> io::Result<bool> {
        match self.execute(&["PING"])? {
            RespValue::SimpleString(s) => Ok(s == "PONG"),
            _ => Ok(false),
        }
    }
}

// Blanket implementation: any ControlPlane automatically gets ControlPlaneExt
impl<T: ControlPlane> ControlPlaneExt for T {}

/// Interpret an RPUSH reply
pub fn expect_push_reply(reply: RespValue) -> Result<i64> {
    match reply {
        RespValue::Integer(len) => Ok(len),
        RespValue::Error(e) => Err(ProtocolError::ServerError(e).into()),
        other => Err(unexpected("integer", &other).into()),
    }
}

/// Interpret an LPOP reply
pub fn expect_pop_reply(reply: RespValue) -> Result<Option<Vec<u8>>> {
    match reply {
        RespValue::BulkString(data) => Ok(Some(data)),
        RespValue::Null => Ok(None),
        RespValue::Error(e) => Err(ProtocolError::ServerError(e).into()),
        other => Err(unexpected("bulk string", &other).into()),
    }
}

fn unexpected(expected: &str, actual: &RespValue) -> ProtocolError {
    ProtocolError::UnexpectedResponse {
        expected: expected.to_string(),
        actual: actual.kind().to_string(),
    }
}
