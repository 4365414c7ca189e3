//! Connection lifecycle: handles, the pool that owns them, and the
//! identity registry.

pub mod handle;
pub mod manager;
pub mod pool;
pub mod registry;

pub use handle::{ConnectionHandle, ConnectionId};
pub use manager::ConnectionManager;
pub use pool::ConnectionPool;
pub use registry::ConnectionRegistry;
