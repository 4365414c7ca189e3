//! Top-level realtime engine wiring the pool, registry and bus together.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use taskhub_auth::TokenValidator;
use taskhub_core::config::RealtimeConfig;

use crate::connection::{ConnectionManager, ConnectionPool, ConnectionRegistry};
use crate::metrics::{MetricsSnapshot, RealtimeMetrics};
use crate::notification::NotificationBus;

/// Central realtime engine, constructed once at startup and shared by `Arc`.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection lifecycle and inbound protocol.
    pub connections: Arc<ConnectionManager>,
    /// Identity bindings.
    pub registry: Arc<ConnectionRegistry>,
    /// Outbound session events.
    pub bus: Arc<NotificationBus>,
    /// Counters.
    pub metrics: Arc<RealtimeMetrics>,
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .field("identities", &self.registry.identity_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates the engine. `validator` checks tokens sent with announcements.
    pub fn new(config: RealtimeConfig, validator: Arc<TokenValidator>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RealtimeMetrics::new());
        let pool = Arc::new(ConnectionPool::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let connections = Arc::new(ConnectionManager::new(
            config,
            pool.clone(),
            registry.clone(),
            validator,
            metrics.clone(),
        ));
        let bus = Arc::new(NotificationBus::new(pool, registry.clone(), metrics.clone()));

        info!("Realtime engine initialized");

        Self {
            connections,
            registry,
            bus,
            metrics,
            shutdown_tx,
        }
    }

    /// Receiver that fires once when the engine shuts down.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Current counters plus live gauges.
    pub fn stats(&self) -> RealtimeStats {
        RealtimeStats {
            open_connections: self.connections.connection_count(),
            bound_identities: self.registry.identity_count(),
            counters: self.metrics.snapshot(),
        }
    }

    /// Tell connection tasks to stop and drop every connection.
    pub fn shutdown(&self) {
        info!("Shutting down realtime engine");
        let _ = self.shutdown_tx.send(());
        self.connections.close_all();
    }
}

/// Health view of the realtime channel.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeStats {
    /// Connections open right now.
    pub open_connections: usize,
    /// Identities with at least one bound connection.
    pub bound_identities: usize,
    /// Lifetime counters.
    pub counters: MetricsSnapshot,
}
