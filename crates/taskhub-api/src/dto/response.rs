//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskhub_core::types::pagination::PageResponse;
use taskhub_entity::task::Task;
use taskhub_entity::user::User;
use taskhub_realtime::server::RealtimeStats;

/// `{message}` acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Human-readable result.
    pub message: String,
}

/// Registration result.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// Bearer token for the new account.
    pub token: String,
}

/// Login result. The password hash never serializes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The signed-in user.
    pub user: User,
}

/// Pagination block of the user listing.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    /// Users matching the filter.
    pub total: u64,
    /// Current page.
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Number of pages.
    pub pages: u64,
}

/// `GET /api/users` body.
#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    /// The page of users.
    pub users: Vec<User>,
    /// Paging metadata.
    pub pagination: PaginationMeta,
}

impl From<PageResponse<User>> for UserListResponse {
    fn from(page: PageResponse<User>) -> Self {
        Self {
            pagination: PaginationMeta {
                total: page.total_items,
                page: page.page,
                limit: page.page_size,
                pages: page.total_pages,
            },
            users: page.items,
        }
    }
}

/// `PUT /api/users/status` body.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateResponse {
    /// Human-readable result.
    pub message: String,
    /// The user after the change.
    pub user: User,
}

/// `GET /api/tasks` body. `count` is the total across all pages.
#[derive(Debug, Clone, Serialize)]
pub struct TaskListResponse {
    /// The page of tasks.
    pub tasks: Vec<Task>,
    /// Total number of tasks.
    pub count: u64,
}

impl From<PageResponse<Task>> for TaskListResponse {
    fn from(page: PageResponse<Task>) -> Self {
        Self {
            count: page.total_items,
            tasks: page.items,
        }
    }
}

/// `PATCH /api/tasks/bulk` body.
#[derive(Debug, Clone, Serialize)]
pub struct BulkUpdateResponse {
    /// Human-readable result.
    pub message: String,
    /// Tasks actually changed.
    pub updated: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// `connected`, `unreachable`, or `memory`.
    pub database: String,
    /// Realtime channel gauges and counters.
    pub realtime: RealtimeStats,
}
