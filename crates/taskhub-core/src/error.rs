//! Unified application error types for TaskHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The HTTP mapping lives here as well
//! so every handler can return `Result<_, AppError>` directly.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::types::response::ApiErrorResponse;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No credential was presented, or it names an identity that no longer exists.
    Unauthenticated,
    /// The credential could not be decoded.
    MalformedCredential,
    /// The credential signature does not verify.
    SignatureInvalid,
    /// The credential validity window has elapsed.
    Expired,
    /// The credential was issued before the identity's last revocation.
    StaleCredential,
    /// The identity exists but has been deactivated.
    AccountInactive,
    /// The caller is authenticated but not allowed to perform the action.
    Forbidden,
    /// Input validation failed.
    Validation,
    /// A status change named something other than `active` or `inactive`.
    InvalidStatusValue,
    /// The requested resource was not found.
    NotFound,
    /// A conflict occurred (duplicate entry, etc.).
    Conflict,
    /// The persistence layer failed.
    Database,
    /// An internal server error occurred.
    Internal,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl ErrorKind {
    /// Machine-readable code placed in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::MalformedCredential => "MALFORMED_CREDENTIAL",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::Expired => "CREDENTIAL_EXPIRED",
            Self::StaleCredential => "STALE_CREDENTIAL",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation => "VALIDATION_ERROR",
            Self::InvalidStatusValue => "INVALID_STATUS_VALUE",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Database | Self::Internal | Self::Configuration | Self::Serialization => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// HTTP status this kind is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated
            | Self::MalformedCredential
            | Self::SignatureInvalid
            | Self::Expired
            | Self::StaleCredential => StatusCode::UNAUTHORIZED,
            Self::AccountInactive | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation | Self::InvalidStatusValue => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Database | Self::Internal | Self::Configuration | Self::Serialization => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the underlying message must be hidden from API clients.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::MalformedCredential => write!(f, "MALFORMED_CREDENTIAL"),
            Self::SignatureInvalid => write!(f, "SIGNATURE_INVALID"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::StaleCredential => write!(f, "STALE_CREDENTIAL"),
            Self::AccountInactive => write!(f, "ACCOUNT_INACTIVE"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::InvalidStatusValue => write!(f, "INVALID_STATUS_VALUE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Database => write!(f, "DATABASE"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error used throughout TaskHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// Create a malformed-credential error.
    pub fn malformed_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedCredential, message)
    }

    /// Create a signature-invalid error.
    pub fn signature_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SignatureInvalid, message)
    }

    /// Create an expired-credential error.
    pub fn expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Expired, message)
    }

    /// Create a stale-credential error.
    pub fn stale_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StaleCredential, message)
    }

    /// Create an account-inactive error.
    pub fn account_inactive(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountInactive, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an invalid-status-value error.
    pub fn invalid_status(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidStatusValue, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::with_source(ErrorKind::Database, format!("Database error: {err}"), err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        let message = if self.kind.is_server_error() {
            tracing::error!(kind = %self.kind, error = %self.message, "Internal server error");
            "Internal server error".to_string()
        } else {
            self.message.clone()
        };

        let body = ApiErrorResponse {
            error: self.kind.code().to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}
