//! The revocation-aware authentication gate.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_database::UserStore;
use taskhub_entity::user::UserRole;

use crate::jwt::TokenCodec;

/// Who a request is acting as, once the gate has let it through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// The authenticated user.
    pub user_id: Uuid,
    /// The user's role as currently stored.
    pub role: UserRole,
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validates credentials against the live user record.
///
/// A token is honored only when its signature and expiry check out, the user
/// still exists, the embedded version equals the user's current
/// `token_version`, and the account is active. A token revoked by
/// deactivation fails the version check first and reports as stale. The
/// record is read fresh on every call.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
}

impl TokenValidator {
    /// Create a gate over `users`.
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self { codec, users }
    }

    /// The codec this gate verifies with.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Run the gate. `None` means no credential was presented.
    pub async fn validate(&self, token: Option<&str>) -> AppResult<AuthenticatedIdentity> {
        let token = token.ok_or_else(|| AppError::unauthenticated("No credential provided"))?;

        let claims = self.codec.verify(token)?;

        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| {
                debug!(user_id = %claims.user_id(), "Credential subject no longer exists");
                AppError::unauthenticated("User not found")
            })?;

        if user.token_version != claims.ver {
            debug!(
                user_id = %user.id,
                token_ver = claims.ver,
                current_ver = user.token_version,
                "Rejected revoked credential"
            );
            return Err(AppError::stale_credential(
                "Credential has been revoked; please log in again",
            ));
        }

        if !user.can_login() {
            debug!(user_id = %user.id, "Rejected credential for inactive account");
            return Err(AppError::account_inactive("Account is inactive"));
        }

        Ok(AuthenticatedIdentity {
            user_id: user.id,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use taskhub_core::ErrorKind;
    use taskhub_database::MemoryUserStore;
    use taskhub_entity::user::{CreateUser, User, UserStatus};

    use super::*;

    async fn setup() -> (TokenValidator, Arc<MemoryUserStore>, User) {
        let store = Arc::new(MemoryUserStore::new());
        let user = store
            .create(&CreateUser {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap();
        let codec = Arc::new(TokenCodec::from_secret("gate-secret", Duration::minutes(60)));
        let validator = TokenValidator::new(codec, store.clone());
        (validator, store, user)
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let (validator, _, user) = setup().await;
        let issued = validator
            .codec()
            .issue(user.id, user.role, user.token_version)
            .unwrap();

        let identity = validator.validate(Some(&issued.token)).await.unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let (validator, _, _) = setup().await;
        let err = validator.validate(None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_token_for_deactivated_user_is_stale() {
        let (validator, store, user) = setup().await;
        let issued = validator.codec().issue(user.id, user.role, 0).unwrap();

        store
            .set_status_and_revoke(user.id, UserStatus::Inactive)
            .await
            .unwrap();

        let err = validator.validate(Some(&issued.token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StaleCredential);
    }

    #[tokio::test]
    async fn test_inactive_account_rejected_even_with_current_version() {
        let (validator, store, user) = setup().await;
        let deactivated = store
            .set_status_and_revoke(user.id, UserStatus::Inactive)
            .await
            .unwrap()
            .unwrap();

        // Minted against the post-deactivation counter, so only the status check can stop it.
        let issued = validator
            .codec()
            .issue(user.id, user.role, deactivated.token_version)
            .unwrap();

        let err = validator.validate(Some(&issued.token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccountInactive);
    }

    #[tokio::test]
    async fn test_token_from_before_reactivation_stays_dead() {
        let (validator, store, user) = setup().await;
        let old = validator.codec().issue(user.id, user.role, 0).unwrap();

        store
            .set_status_and_revoke(user.id, UserStatus::Inactive)
            .await
            .unwrap();
        let reactivated = store
            .set_status_and_revoke(user.id, UserStatus::Active)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reactivated.token_version, 2);

        let err = validator.validate(Some(&old.token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StaleCredential);

        let fresh = validator
            .codec()
            .issue(user.id, user.role, reactivated.token_version)
            .unwrap();
        assert!(validator.validate(Some(&fresh.token)).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthenticated() {
        let (validator, _, _) = setup().await;
        let issued = validator
            .codec()
            .issue(Uuid::new_v4(), UserRole::Admin, 0)
            .unwrap();
        let err = validator.validate(Some(&issued.token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_codec_errors_propagate() {
        let (validator, _, user) = setup().await;
        let foreign = TokenCodec::from_secret("other", Duration::minutes(60))
            .issue(user.id, user.role, 0)
            .unwrap();
        let err = validator.validate(Some(&foreign.token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::SignatureInvalid);

        let err = validator.validate(Some("garbage")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedCredential);
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(Some("Bearer   ")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(None), None);
    }
}
