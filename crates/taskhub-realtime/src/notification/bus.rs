//! Best-effort push of session events to live connections.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use taskhub_core::result::AppResult;
use taskhub_entity::user::UserStatus;
use taskhub_service::{DeliveryReport, LogoutReason, SessionNotifier};

use crate::connection::{ConnectionHandle, ConnectionPool, ConnectionRegistry};
use crate::message::OutboundMessage;
use crate::metrics::RealtimeMetrics;

/// Resolves identities to connections and queues frames on them.
///
/// Never waits on a slow client: a full buffer drops the frame.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    pool: Arc<ConnectionPool>,
    registry: Arc<ConnectionRegistry>,
    metrics: Arc<RealtimeMetrics>,
}

impl NotificationBus {
    /// Creates a bus over the given pool and registry.
    pub fn new(
        pool: Arc<ConnectionPool>,
        registry: Arc<ConnectionRegistry>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            pool,
            registry,
            metrics,
        }
    }

    /// Push `message` to every connection bound to `user_id`.
    pub fn notify_identity(
        &self,
        user_id: Uuid,
        message: &OutboundMessage,
    ) -> AppResult<DeliveryReport> {
        let frame = message.to_frame()?;
        let handles: Vec<Arc<ConnectionHandle>> = self
            .registry
            .handles_for(&user_id)
            .iter()
            .filter_map(|conn_id| self.pool.get(conn_id))
            .collect();
        Ok(self.deliver(&handles, &frame))
    }

    /// Push `message` to every open connection, bound or not.
    pub fn broadcast_all(&self, message: &OutboundMessage) -> AppResult<DeliveryReport> {
        let frame = message.to_frame()?;
        Ok(self.deliver(&self.pool.all_connections(), &frame))
    }

    fn deliver(&self, handles: &[Arc<ConnectionHandle>], frame: &str) -> DeliveryReport {
        let mut report = DeliveryReport {
            attempted: handles.len(),
            delivered: 0,
        };
        for handle in handles {
            match handle.send(frame.to_string()) {
                Ok(()) => report.delivered += 1,
                Err(e) => warn!(error = %e, "Dropped realtime frame"),
            }
        }
        self.metrics
            .record_delivery(report.attempted, report.delivered);
        report
    }
}

#[async_trait]
impl SessionNotifier for NotificationBus {
    async fn force_logout(&self, user_id: Uuid, reason: LogoutReason) -> AppResult<DeliveryReport> {
        let report = self.notify_identity(user_id, &OutboundMessage::force_logout(user_id, reason))?;
        self.metrics.force_logout_sent();
        info!(
            user_id = %user_id,
            reason = reason.as_str(),
            attempted = report.attempted,
            delivered = report.delivered,
            "Force-logout pushed"
        );
        Ok(report)
    }

    async fn broadcast_status_change(
        &self,
        user_id: Uuid,
        status: UserStatus,
    ) -> AppResult<DeliveryReport> {
        let report = self.broadcast_all(&OutboundMessage::status_change(user_id, status))?;
        debug!(
            user_id = %user_id,
            status = %status,
            attempted = report.attempted,
            delivered = report.delivered,
            "Status change broadcast"
        );
        Ok(report)
    }
}
