//! Connection pool
//!
//! Pooling is delegated to r2d2. `ConnectionFactory` is the connection
//! manager: it dials, validates with PING on checkout and reports
//! connections that hit an I/O error as broken so they are not reused.

use std::time::Duration;

use tracing::warn;

use super::control_plane::ControlPlaneExt;
use super::raw_connection::{ConnectionFactory, RawConnection};
use crate::config::BenchmarkConfig;
use crate::utils::{ConnectionError, PoolError};

pub type ConnectionPool = r2d2::Pool<ConnectionFactory>;

/// Pool sizing and timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound on open connections
    pub max_size: u32,
    /// Idle connections older than this are closed
    pub idle_timeout: Duration,
    /// How long a checkout waits for a free connection
    pub checkout_timeout: Duration,
}

impl PoolConfig {
    /// One connection per worker plus one for the startup check
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        Self {
            max_size: config.pool_size(),
            idle_timeout: config.idle_timeout,
            checkout_timeout: config.connect_timeout,
        }
    }
}

impl r2d2::ManageConnection for ConnectionFactory {
    type Connection = RawConnection;
    type Error = ConnectionError;

    fn connect(&self) -> Result<RawConnection, ConnectionError> {
        self.create()
    }

    fn is_valid(&self, conn: &mut RawConnection) -> Result<(), ConnectionError> {
        if conn.ping()? {
            Ok(())
        } else {
            Err(ConnectionError::PingFailed)
        }
    }

    fn has_broken(&self, conn: &mut RawConnection) -> bool {
        conn.is_broken()
    }
}

/// Routes pool-internal connection errors to the log
#[derive(Debug)]
struct TracingErrorHandler;

impl r2d2::HandleError<ConnectionError> for TracingErrorHandler {
    fn handle_error(&self, error: ConnectionError) {
        warn!("Connection pool: {}", error);
    }
}

/// Build a lazily filled pool; nothing is dialed until the first checkout
pub fn build_pool(
    factory: ConnectionFactory,
    pool_config: PoolConfig,
) -> Result<ConnectionPool, PoolError> {
    r2d2::Pool::builder()
        .max_size(pool_config.max_size)
        .min_idle(Some(0))
        .idle_timeout(Some(pool_config.idle_timeout))
        .max_lifetime(None)
        .connection_timeout(pool_config.checkout_timeout)
        .error_handler(Box::new(TracingErrorHandler))
        .build(factory)
        .map_err(PoolError::Build)
}
