//! Client connection layer

pub mod control_plane;
pub mod pool;
pub mod raw_connection;

pub use control_plane::{expect_pop_reply, expect_push_reply, ControlPlane, ControlPlaneExt};
pub use pool::{build_pool, ConnectionPool, PoolConfig};
pub use raw_connection::{ConnectionFactory, RawConnection};
