//! Realtime counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Monotonic counters for the realtime channel.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_opened: AtomicU64,
    connections_closed: AtomicU64,
    messages_received: AtomicU64,
    messages_sent: AtomicU64,
    delivery_failures: AtomicU64,
    force_logouts: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// A connection was opened.
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// A connection was closed.
    pub fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// An inbound frame was processed.
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the result of a push to `attempted` connections.
    pub fn record_delivery(&self, attempted: usize, delivered: usize) {
        self.messages_sent
            .fetch_add(delivered as u64, Ordering::Relaxed);
        self.delivery_failures
            .fetch_add(attempted.saturating_sub(delivered) as u64, Ordering::Relaxed);
    }

    /// A targeted force-logout was pushed.
    pub fn force_logout_sent(&self) {
        self.force_logouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        MetricsSnapshot {
            connections_opened: opened,
            connections_active: opened.saturating_sub(closed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            force_logouts: self.force_logouts.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of [`RealtimeMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Connections ever opened.
    pub connections_opened: u64,
    /// Connections open right now.
    pub connections_active: u64,
    /// Inbound frames processed.
    pub messages_received: u64,
    /// Frames queued successfully.
    pub messages_sent: u64,
    /// Frames dropped (buffer full or closed).
    pub delivery_failures: u64,
    /// Targeted force-logout pushes.
    pub force_logouts: u64,
}
