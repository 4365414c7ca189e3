//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Placeholder secret shipped in the default configuration.
pub const INSECURE_DEFAULT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256). Loaded once at startup.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Credential validity window in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Minimum password length accepted at registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl AuthConfig {
    /// Whether the signing secret is still the shipped placeholder.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == INSECURE_DEFAULT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_jwt_secret() -> String {
    INSECURE_DEFAULT_SECRET.to_string()
}

fn default_token_ttl() -> u64 {
    60
}

fn default_password_min() -> usize {
    8
}
