//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use super::status::UserStatus;

/// A registered user in TaskHub.
///
/// `status` and `token_version` are only ever changed together, by the
/// store's atomic status-change primitive. Every other write path leaves
/// them untouched.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email, unique case-insensitively.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Access level.
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// Revocation counter. Starts at 0, only ever incremented.
    pub token_version: i64,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a fresh record from registration data.
    pub fn from_create(data: &CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            status: UserStatus::Active,
            token_version: 0,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_starts_active_at_version_zero() {
        let user = User::from_create(&CreateUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
            role: UserRole::User,
        });
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.token_version, 0);
        assert!(user.can_login());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::from_create(&CreateUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: UserRole::Admin,
        });
        let json = serde_json::to_value(&user).expect("serialize");
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["tokenVersion"], 0);
        assert_eq!(json["status"], "active");
    }
}
