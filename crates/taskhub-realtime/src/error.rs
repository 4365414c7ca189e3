//! Per-connection delivery failures.

use thiserror::Error;

use crate::connection::ConnectionId;

/// Why a frame did not reach one connection. Logged and counted, never
/// surfaced to the caller that triggered the push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The connection's outbound buffer is full; the frame was dropped.
    #[error("outbound buffer full for connection {0}")]
    BufferFull(ConnectionId),
    /// The connection is already closed.
    #[error("connection {0} is closed")]
    Closed(ConnectionId),
}
