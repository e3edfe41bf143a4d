//! Raw TCP connection for benchmark traffic
//!
//! Direct TCP connections with pre-allocated buffers. Reader and writer
//! halves are split over a cloned socket.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use super::control_plane::ControlPlane;
use crate::config::{BenchmarkConfig, ServerAddress};
use crate::utils::{ConnectionError, RespDecoder, RespEncoder, RespValue};

/// Raw TCP connection
pub struct RawConnection {
    writer: BufWriter<TcpStream>,
    reader: BufReader<TcpStream>,
    /// Set once an I/O error leaves the stream in an unknown state
    broken: bool,
}

impl RawConnection {
    /// Create new TCP connection
    pub fn connect_tcp(
        host: &str,
        port: u16,
        connect_timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        let connect_failed = |source: io::Error| ConnectionError::ConnectFailed {
            host: host.to_string(),
            port,
            source,
        };

        let addr = (host, port)
            .to_socket_addrs()
            .map_err(connect_failed)?
            .next()
            .ok_or_else(|| {
                connect_failed(io::Error::new(
                    io::ErrorKind::NotFound,
                    "No addresses found",
                ))
            })?;

        let stream = TcpStream::connect_timeout(&addr, connect_timeout).map_err(connect_failed)?;

        // Disable Nagle's algorithm
        stream.set_nodelay(true).ok();

        let writer = BufWriter::with_capacity(65536, stream.try_clone().map_err(connect_failed)?);
        let reader = BufReader::with_capacity(65536, stream);

        Ok(RawConnection {
            writer,
            reader,
            broken: false,
        })
    }

    /// Read a single RESP response
    fn read_response(&mut self) -> io::Result<RespValue> {
        let mut decoder = RespDecoder::new(&mut self.reader);
        decoder.decode()
    }

    fn round_trip(&mut self, encoder: &RespEncoder) -> io::Result<RespValue> {
        self.writer.write_all(encoder.as_bytes())?;
        self.writer.flush()?;
        self.read_response()
    }

    /// True after any command failed at the I/O level
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Send AUTH command
    pub fn authenticate(&mut self, password: &str) -> Result<(), ConnectionError> {
        let response = self
            .execute(&["AUTH", password])
            .map_err(|e| ConnectionError::AuthFailed(format!("IO error: {}", e)))?;

        match response {
            RespValue::SimpleString(s) if s == "OK" => Ok(()),
            RespValue::Error(e) => Err(ConnectionError::AuthFailed(e)),
            other => Err(ConnectionError::AuthFailed(format!(
                "Unexpected response: {:?}",
                other
            ))),
        }
    }

    /// Set read and write timeouts (None = block forever)
    pub fn set_timeouts(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)
    }
}

impl ControlPlane for RawConnection {
    fn execute(&mut self, args: &[&str]) -> io::Result<RespValue> {
        let mut encoder = RespEncoder::with_capacity(64);
        encoder.encode_command_str(args);
        self.execute_encoded(&encoder)
    }

    fn execute_encoded(&mut self, encoder: &RespEncoder) -> io::Result<RespValue> {
        let result = self.round_trip(encoder);
        if result.is_err() {
            self.broken = true;
        }
        result
    }
}

/// Connection factory for creating connections with common config
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    pub address: ServerAddress,
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub auth_password: Option<String>,
}

impl ConnectionFactory {
    /// Build a factory from the benchmark configuration
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        Self {
            address: config.address.clone(),
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
            auth_password: config.password.clone(),
        }
    }

    /// Create a new connection to the configured server
    pub fn create(&self) -> Result<RawConnection, ConnectionError> {
        let ServerAddress { host, port } = &self.address;
        let mut conn = RawConnection::connect_tcp(host, *port, self.connect_timeout)?;

        conn.set_timeouts(self.request_timeout)
            .map_err(|source| ConnectionError::ConnectFailed {
                host: host.clone(),
                port: *port,
                source,
            })?;

        if let Some(ref password) = self.auth_password {
            conn.authenticate(password)?;
        }

        debug!("Dialed {}", self.address);
        Ok(conn)
    }
}
