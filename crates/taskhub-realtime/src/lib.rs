//! # taskhub-realtime
//!
//! Realtime channel for TaskHub. Provides:
//!
//! - Connection handles and the transport-side connection pool
//! - The identity → connection registry fed by client announcements
//! - The inbound event protocol (`authenticate`, `test`)
//! - The notification bus that pushes `force-logout` on status changes
//! - Connection and delivery counters
//!
//! Everything here is process-local. Missing a push never weakens
//! revocation; the token gate enforces it on the next request.

pub mod connection;
pub mod error;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod server;

pub use connection::{ConnectionHandle, ConnectionId, ConnectionManager, ConnectionPool, ConnectionRegistry};
pub use error::DeliveryError;
pub use notification::NotificationBus;
pub use server::RealtimeEngine;
