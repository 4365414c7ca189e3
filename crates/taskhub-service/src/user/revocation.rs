//! Account status changes and the session revocation they trigger.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_database::UserStore;
use taskhub_entity::user::{User, UserStatus};

use crate::context::RequestContext;
use crate::notifier::{DeliveryReport, LogoutReason, SessionNotifier};

/// Result of a successful status change.
#[derive(Debug, Clone)]
pub struct StatusChangeOutcome {
    /// The user after the write, with its new `token_version`.
    pub user: User,
    /// Targeted force-logout delivery. Zero when the notifier failed.
    pub logout: DeliveryReport,
    /// Broadcast delivery, present only when the user was deactivated.
    pub broadcast: Option<DeliveryReport>,
}

/// Changes account status and revokes every outstanding credential.
///
/// The status write and the counter increment are one store operation.
/// Notification happens after the write commits and cannot fail the call:
/// a client that misses the push is still locked out by the counter check.
#[derive(Debug, Clone)]
pub struct RevocationCoordinator {
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn SessionNotifier>,
}

impl RevocationCoordinator {
    /// Creates a new coordinator.
    pub fn new(users: Arc<dyn UserStore>, notifier: Arc<dyn SessionNotifier>) -> Self {
        Self { users, notifier }
    }

    /// Set `user_id`'s status from its raw wire value.
    ///
    /// Only the exact strings `active` and `inactive` are accepted. Setting
    /// the status a user already has still revokes their credentials.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        requested_status: &str,
    ) -> AppResult<StatusChangeOutcome> {
        ctx.require_admin()?;

        let status: UserStatus = requested_status.parse()?;

        if user_id == ctx.user_id {
            return Err(AppError::forbidden("Cannot change your own status"));
        }

        let user = self
            .users
            .set_status_and_revoke(user_id, status)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        info!(
            admin_id = %ctx.user_id,
            target_id = %user_id,
            new_status = %status,
            token_version = user.token_version,
            "User status changed"
        );

        let logout = match self
            .notifier
            .force_logout(user_id, LogoutReason::StatusChange)
            .await
        {
            Ok(report) => report,
            Err(e) => {
                warn!(target_id = %user_id, error = %e, "Force-logout push failed");
                DeliveryReport::default()
            }
        };

        let broadcast = if status == UserStatus::Inactive {
            match self.notifier.broadcast_status_change(user_id, status).await {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(target_id = %user_id, error = %e, "Status broadcast failed");
                    Some(DeliveryReport::default())
                }
            }
        } else {
            None
        };

        Ok(StatusChangeOutcome {
            user,
            logout,
            broadcast,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use taskhub_core::ErrorKind;
    use taskhub_database::MemoryUserStore;
    use taskhub_entity::user::{CreateUser, UserRole};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Pushed {
        Logout(Uuid),
        Broadcast(Uuid, UserStatus),
    }

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        pushed: Mutex<Vec<Pushed>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn pushed(&self) -> Vec<Pushed> {
            self.pushed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SessionNotifier for RecordingNotifier {
        async fn force_logout(
            &self,
            user_id: Uuid,
            _reason: LogoutReason,
        ) -> AppResult<DeliveryReport> {
            self.pushed.lock().unwrap().push(Pushed::Logout(user_id));
            if self.fail {
                return Err(AppError::internal("notifier down"));
            }
            Ok(DeliveryReport {
                attempted: 2,
                delivered: 2,
            })
        }

        async fn broadcast_status_change(
            &self,
            user_id: Uuid,
            status: UserStatus,
        ) -> AppResult<DeliveryReport> {
            self.pushed
                .lock()
                .unwrap()
                .push(Pushed::Broadcast(user_id, status));
            if self.fail {
                return Err(AppError::internal("notifier down"));
            }
            Ok(DeliveryReport {
                attempted: 5,
                delivered: 4,
            })
        }
    }

    struct Fixture {
        store: Arc<MemoryUserStore>,
        notifier: Arc<RecordingNotifier>,
        coordinator: RevocationCoordinator,
        admin: RequestContext,
        target: User,
    }

    async fn fixture(notifier: RecordingNotifier) -> Fixture {
        let store = Arc::new(MemoryUserStore::new());
        let admin = store
            .create(&CreateUser {
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        let target = store
            .create(&CreateUser {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap();
        let notifier = Arc::new(notifier);
        let coordinator = RevocationCoordinator::new(store.clone(), notifier.clone());
        Fixture {
            store,
            notifier,
            coordinator,
            admin: RequestContext::new(admin.id, UserRole::Admin),
            target,
        }
    }

    #[tokio::test]
    async fn test_deactivate_revokes_and_notifies() {
        let f = fixture(RecordingNotifier::default()).await;

        let outcome = f
            .coordinator
            .set_status(&f.admin, f.target.id, "inactive")
            .await
            .unwrap();

        assert_eq!(outcome.user.status, UserStatus::Inactive);
        assert_eq!(outcome.user.token_version, f.target.token_version + 1);
        assert_eq!(outcome.logout.delivered, 2);
        assert_eq!(outcome.broadcast.map(|b| b.attempted), Some(5));
        assert_eq!(
            f.notifier.pushed(),
            vec![
                Pushed::Logout(f.target.id),
                Pushed::Broadcast(f.target.id, UserStatus::Inactive)
            ]
        );
    }

    #[tokio::test]
    async fn test_reactivate_logs_out_without_broadcast() {
        let f = fixture(RecordingNotifier::default()).await;
        f.coordinator
            .set_status(&f.admin, f.target.id, "inactive")
            .await
            .unwrap();

        let outcome = f
            .coordinator
            .set_status(&f.admin, f.target.id, "active")
            .await
            .unwrap();
        assert_eq!(outcome.user.status, UserStatus::Active);
        assert_eq!(outcome.user.token_version, 2);
        assert!(outcome.broadcast.is_none());
        assert_eq!(f.notifier.pushed().last(), Some(&Pushed::Logout(f.target.id)));
    }

    #[tokio::test]
    async fn test_invalid_status_changes_nothing() {
        let f = fixture(RecordingNotifier::default()).await;

        for raw in ["Inactive", "disabled", "", " active"] {
            let err = f
                .coordinator
                .set_status(&f.admin, f.target.id, raw)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidStatusValue);
        }

        let stored = f.store.find_by_id(f.target.id).await.unwrap().unwrap();
        assert_eq!(stored.token_version, 0);
        assert!(f.notifier.pushed().is_empty());
    }

    #[tokio::test]
    async fn test_cannot_change_own_status() {
        let f = fixture(RecordingNotifier::default()).await;
        let err = f
            .coordinator
            .set_status(&f.admin, f.admin.user_id, "inactive")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let f = fixture(RecordingNotifier::default()).await;
        let err = f
            .coordinator
            .set_status(&f.admin, Uuid::new_v4(), "inactive")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(f.notifier.pushed().is_empty());
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let f = fixture(RecordingNotifier::default()).await;
        let ctx = RequestContext::new(f.target.id, UserRole::User);
        let err = f
            .coordinator
            .set_status(&ctx, Uuid::new_v4(), "inactive")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_fail_the_change() {
        let f = fixture(RecordingNotifier::failing()).await;

        let outcome = f
            .coordinator
            .set_status(&f.admin, f.target.id, "inactive")
            .await
            .unwrap();
        assert_eq!(outcome.user.status, UserStatus::Inactive);
        assert_eq!(outcome.logout, DeliveryReport::default());

        let stored = f.store.find_by_id(f.target.id).await.unwrap().unwrap();
        assert_eq!(stored.token_version, 1);
    }
}
