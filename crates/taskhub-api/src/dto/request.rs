//! Request DTOs with validation.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::pagination::PageRequest;
use taskhub_database::UserFilter;
use taskhub_entity::user::{UserRole, UserStatus};

use crate::extractors::pagination::lenient_u64;

/// Default page size of the user listing.
pub const USER_PAGE_SIZE: u64 = 10;
/// Default page size of the task listing.
pub const TASK_PAGE_SIZE: u64 = 5;

/// Unwrap a JSON body, turning extractor rejections into validation errors.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(inner)| inner)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

/// Run the derive-based checks and flatten the failures into one message.
pub fn validate_request<T: Validate>(req: &T) -> AppResult<()> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {e}")))
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Plain-text password; the strength policy runs in the service.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Query string of `GET /api/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    /// Page number (1-based).
    #[serde(default, deserialize_with = "lenient_u64")]
    pub page: Option<u64>,
    /// Items per page.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub limit: Option<u64>,
    /// `active` or `inactive`.
    pub status: Option<String>,
    /// `admin` or `user`.
    pub role: Option<String>,
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
}

impl UserListQuery {
    /// The requested page.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page, self.limit, USER_PAGE_SIZE)
    }

    /// Typed filter. Empty parameters are ignored.
    pub fn filter(&self) -> AppResult<UserFilter> {
        let status = present(&self.status)
            .map(str::parse::<UserStatus>)
            .transpose()?;
        let role = present(&self.role).map(str::parse::<UserRole>).transpose()?;

        Ok(UserFilter {
            status,
            role,
            search: present(&self.search).map(str::to_string),
        })
    }
}

/// Body of `PUT /api/users/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    /// The user whose status changes.
    pub id: Uuid,
    /// Raw status; only `active` and `inactive` are accepted downstream.
    pub status: String,
}

impl StatusUpdateRequest {
    /// Strict parse. Any shape other than `{id: uuid, status: string}` is an
    /// invalid status value.
    pub fn from_body(body: Result<Json<Value>, JsonRejection>) -> AppResult<Self> {
        let Json(value) = body.map_err(|_| invalid_status_body())?;
        serde_json::from_value(value).map_err(|_| invalid_status_body())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn invalid_status_body() -> AppError {
    AppError::invalid_status("Body must be {\"id\": <uuid>, \"status\": \"active\" | \"inactive\"}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use taskhub_core::ErrorKind;

    use super::*;

    #[test]
    fn test_status_body_strict() {
        let id = Uuid::new_v4();
        let ok = StatusUpdateRequest::from_body(Ok(Json(json!({"id": id, "status": "inactive"}))))
            .unwrap();
        assert_eq!(ok.id, id);
        assert_eq!(ok.status, "inactive");

        for bad in [
            json!({"id": id}),
            json!({"id": id, "status": ["i", "n"]}),
            json!({"0": "a", "1": "c", "id": id}),
            json!({"id": "not-a-uuid", "status": "active"}),
            json!("inactive"),
        ] {
            let err = StatusUpdateRequest::from_body(Ok(Json(bad))).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidStatusValue);
        }
    }

    #[test]
    fn test_user_filter_parsing() {
        let query = UserListQuery {
            status: Some("inactive".to_string()),
            role: Some("ADMIN".to_string()),
            search: Some("  ".to_string()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.status, Some(UserStatus::Inactive));
        assert_eq!(filter.role, Some(UserRole::Admin));
        assert_eq!(filter.search, None);

        let bad = UserListQuery {
            status: Some("Inactive".to_string()),
            ..Default::default()
        };
        assert_eq!(bad.filter().unwrap_err().kind, ErrorKind::InvalidStatusValue);
    }

    #[test]
    fn test_register_validation() {
        let req = RegisterRequest {
            name: String::new(),
            email: "nope".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(validate_request(&req).unwrap_err().kind, ErrorKind::Validation);
    }
}
