//! The seam between status changes and the realtime channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskhub_core::result::AppResult;
use taskhub_entity::user::UserStatus;

/// Why a session is being told to log out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoutReason {
    /// An admin changed the account status.
    StatusChange,
}

impl LogoutReason {
    /// Wire name of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatusChange => "status-change",
        }
    }

    /// Text shown to the user being logged out.
    pub fn message(&self) -> &'static str {
        match self {
            Self::StatusChange => {
                "Your account status has been changed by an administrator. Please log in again."
            }
        }
    }
}

/// Outcome of one push. Individual connection failures only lower
/// `delivered`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Connections a send was attempted on.
    pub attempted: usize,
    /// Connections that accepted the frame.
    pub delivered: usize,
}

/// Pushes session-ending events to live connections.
///
/// Delivery is best effort. An `Err` means the notifier itself is broken,
/// never that some client missed the event.
#[async_trait]
pub trait SessionNotifier: Send + Sync + std::fmt::Debug + 'static {
    /// Tell every connection bound to `user_id` to log out.
    async fn force_logout(&self, user_id: Uuid, reason: LogoutReason) -> AppResult<DeliveryReport>;

    /// Tell every open connection that `user_id` now has `status`.
    async fn broadcast_status_change(
        &self,
        user_id: Uuid,
        status: UserStatus,
    ) -> AppResult<DeliveryReport>;
}
