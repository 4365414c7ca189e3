//! Registration and login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use taskhub_auth::jwt::TokenCodec;
use taskhub_auth::password::{PasswordHasher, PasswordValidator};
use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_database::UserStore;
use taskhub_entity::user::{CreateUser, User, UserRole};

/// A signed-in user with a fresh credential.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The bearer token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The user it was issued for.
    pub user: User,
}

/// Handles account creation and credential exchange.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        codec: Arc<TokenCodec>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            users,
            codec,
            hasher,
            validator,
        }
    }

    /// Create an active `user`-role account and sign it in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<AuthSession> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }

        self.validator.validate(password, &[name, email])?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role: UserRole::User,
            })
            .await?;

        let issued = self.codec.issue(user.id, user.role, user.token_version)?;

        info!(user_id = %user.id, "User registered");

        Ok(AuthSession {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    /// Exchange email and password for a credential.
    ///
    /// The password is checked before the account status, so an inactive
    /// account only reveals itself to someone who knows its password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let invalid = || AppError::unauthenticated("Invalid email or password");

        let mut user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid)?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid());
        }

        if !user.can_login() {
            warn!(user_id = %user.id, "Login refused: account inactive");
            return Err(AppError::account_inactive("Account is inactive"));
        }

        let issued = self.codec.issue(user.id, user.role, user.token_version)?;

        user.last_login_at = Some(Utc::now());
        let user = self.users.save(&user).await?;

        info!(user_id = %user.id, token_version = user.token_version, "User logged in");

        Ok(AuthSession {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }
}
