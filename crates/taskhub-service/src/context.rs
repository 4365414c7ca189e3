//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskhub_auth::AuthenticatedIdentity;
use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built once the token gate has passed and handed to every service method
/// so that each operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role as read during validation.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `Forbidden` unless the caller is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin role required"))
        }
    }
}

impl From<AuthenticatedIdentity> for RequestContext {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self::new(identity.user_id, identity.role)
    }
}
