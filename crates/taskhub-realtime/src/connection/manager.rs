//! Connection lifecycle and the inbound protocol.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use taskhub_auth::TokenValidator;
use taskhub_core::config::RealtimeConfig;

use crate::message::{AnnouncePayload, InboundMessage, OutboundMessage};
use crate::metrics::RealtimeMetrics;

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;
use super::registry::ConnectionRegistry;

/// Opens and closes connections and answers client events.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: Arc<ConnectionPool>,
    registry: Arc<ConnectionRegistry>,
    validator: Arc<TokenValidator>,
    metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        pool: Arc<ConnectionPool>,
        registry: Arc<ConnectionRegistry>,
        validator: Arc<TokenValidator>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            pool,
            registry,
            validator,
            metrics,
            config,
        }
    }

    /// Accept a new, not yet announced connection.
    ///
    /// Returns the handle and the receiver the transport drains.
    pub fn open(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(tx));

        self.pool.add(handle.clone());
        self.metrics.connection_opened();

        debug!(conn_id = %handle.id, "Realtime connection opened");
        (handle, rx)
    }

    /// Forget a connection after the transport has gone away.
    pub fn close(&self, conn_id: &ConnectionId) {
        let user_id = self.registry.unbind(conn_id);
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_closed();
            self.metrics.connection_closed();
            info!(
                conn_id = %conn_id,
                user_id = ?user_id,
                "Realtime connection closed"
            );
        }
    }

    /// Process one text frame from a client.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };
        self.metrics.message_received();

        match InboundMessage::parse(raw) {
            Ok(InboundMessage::Authenticate(payload)) => {
                self.authenticate(&handle, payload).await;
            }
            Ok(InboundMessage::Test(received)) => {
                self.reply(
                    &handle,
                    &OutboundMessage::TestResponse {
                        received,
                        message: "Test response from server".to_string(),
                    },
                );
            }
            Err(message) => {
                debug!(conn_id = %conn_id, %message, "Rejected inbound frame");
                self.reply(&handle, &OutboundMessage::error("INVALID_MESSAGE", message));
            }
        }
    }

    async fn authenticate(&self, handle: &ConnectionHandle, payload: AnnouncePayload) {
        let user_id = payload.user_id();

        let verdict = match payload.token() {
            Some(token) => match self.validator.validate(Some(token)).await {
                Ok(identity) if identity.user_id == user_id => Ok(()),
                Ok(_) => Err("Token does not belong to the announced user".to_string()),
                Err(e) => Err(e.message),
            },
            None if self.config.require_announce_token => {
                Err("A token is required to authenticate".to_string())
            }
            None => Ok(()),
        };

        let reply = match verdict {
            Ok(()) => {
                self.registry.bind(user_id, handle.id);
                info!(conn_id = %handle.id, user_id = %user_id, "Realtime connection bound");
                OutboundMessage::Authenticated {
                    success: true,
                    message: "Authenticated".to_string(),
                }
            }
            Err(message) => {
                // A refused announcement drops whatever this connection was bound to.
                let previous = self.registry.unbind(&handle.id);
                warn!(
                    conn_id = %handle.id,
                    user_id = %user_id,
                    previous = ?previous,
                    reason = %message,
                    "Realtime announcement refused"
                );
                OutboundMessage::Authenticated {
                    success: false,
                    message,
                }
            }
        };
        self.reply(handle, &reply);
    }

    fn reply(&self, handle: &ConnectionHandle, message: &OutboundMessage) {
        let frame = match message.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Failed to serialize reply");
                return;
            }
        };
        let delivered = handle.send(frame).is_ok();
        self.metrics.record_delivery(1, usize::from(delivered));
    }

    /// Close every connection, e.g. on shutdown.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for handle in &all {
            self.close(&handle.id);
        }
        info!(count = all.len(), "All realtime connections closed");
    }

    /// The identity registry.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Number of open connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }
}
