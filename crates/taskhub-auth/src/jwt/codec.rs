//! HS256 token issuance and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use taskhub_core::config::AuthConfig;
use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_entity::user::UserRole;

use super::claims::Claims;

/// A freshly signed credential.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The compact JWT.
    pub token: String,
    /// When it stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies credentials with a single shared secret.
///
/// The secret is read once at construction; there is no key rotation.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_secret(
            &config.jwt_secret,
            Duration::minutes(config.token_ttl_minutes as i64),
        )
    }

    /// Build a codec from a raw secret and validity window.
    pub fn from_secret(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Sign a credential for `user_id` embedding its current `token_version`.
    pub fn issue(&self, user_id: Uuid, role: UserRole, token_version: i64) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: user_id,
            role,
            ver: token_version,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature and expiry, returning the embedded claims.
    ///
    /// A token is accepted only while `now < exp`. Does not consult the user
    /// store; see [`TokenValidator`](crate::guard::TokenValidator) for the
    /// full gate.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::expired("Token has expired"),
                JwtErrorKind::InvalidSignature => {
                    AppError::signature_invalid("Token signature is invalid")
                }
                _ => AppError::malformed_credential(format!("Token is malformed: {e}")),
            })?;

        // jsonwebtoken still accepts the exact expiry second.
        if Utc::now().timestamp() >= claims.exp {
            return Err(AppError::expired("Token has expired"));
        }

        Ok(claims)
    }
}
